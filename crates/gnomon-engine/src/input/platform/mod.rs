//! Platform event translation.

mod winit;

pub use winit::translate_window_event;
