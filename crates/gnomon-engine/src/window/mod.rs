//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU layer
//! and the application. This is the frame driver: it invokes the app once
//! per redraw and routes raw input events in between.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
