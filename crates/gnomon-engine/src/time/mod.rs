//! Frame timing.
//!
//! Provides stable, testable frame timing without coupling to the runtime.
//! Wall-clock time (the dial angles) is the viewer's concern, not this
//! module's; everything here is monotonic `Instant` based.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
