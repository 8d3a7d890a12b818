use std::time::{Duration, Instant};

/// dt ceiling. Long stalls (debugger, minimized window) otherwise produce
/// one huge animation step on resume.
const MAX_DT: Duration = Duration::from_millis(250);

/// dt floor, guarding against zero-length deltas from back-to-back redraws.
const MIN_DT: Duration = Duration::from_micros(100);

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    /// Monotonic timestamp taken at the tick.
    pub now: Instant,
    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Produces one clamped [`FrameTime`] per rendered frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    prev: Instant,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            prev: Instant::now(),
            frames: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.prev)
            .clamp(MIN_DT, MAX_DT);
        self.prev = now;

        let snapshot = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frames,
        };
        self.frames = self.frames.wrapping_add(1);
        snapshot
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_clamped() {
        let mut clock = FrameClock::new();
        // Immediate tick: dt must not be zero.
        let ft = clock.tick();
        assert!(ft.dt >= MIN_DT.as_secs_f32());
        assert!(ft.dt <= MAX_DT.as_secs_f32());
    }

    #[test]
    fn frame_index_increments() {
        let mut clock = FrameClock::new();
        let a = clock.tick();
        let b = clock.tick();
        assert_eq!(b.frame_index, a.frame_index + 1);
    }
}
