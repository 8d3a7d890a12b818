//! Gnomon engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the viewer:
//! window/event loop, device and surface management, input translation,
//! frame timing, and textured-mesh rendering.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod mesh;
pub mod render;
