//! Wall-clock sampling and hand angle derivation.
//!
//! All three hand angles are derived from a single time sample per frame so
//! the hands can never drift out of sync with each other by sub-second
//! amounts.

use std::fmt;

use chrono::{Local, NaiveTime, Timelike};

/// One of the three rotating clock indicators.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Hand {
    Hour,
    Minute,
    Second,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Hour, Hand::Minute, Hand::Second];
}

/// The system clock could not be read.
///
/// Not fatal: the caller skips hand animation for the frame and keeps the
/// last transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockUnavailable;

impl fmt::Display for ClockUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system wall-clock time is unavailable")
    }
}

impl std::error::Error for ClockUnavailable {}

/// Abstraction over local wall-clock time, for deterministic angle math
/// under test.
pub trait WallClock {
    fn now(&self) -> Result<NaiveTime, ClockUnavailable>;
}

/// Production clock delegating to the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> Result<NaiveTime, ClockUnavailable> {
        Ok(Local::now().time())
    }
}

/// Absolute hand angles for one time sample, in degrees within [0, 360).
///
/// Angle zero is 12 o'clock; angles grow in the clockwise direction of dial
/// motion. Only whole seconds participate — the second hand ticks once per
/// second rather than sweeping.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandAngles {
    hour: f32,
    minute: f32,
    second: f32,
}

impl HandAngles {
    /// Reads `clock` once and derives all three angles from that sample.
    pub fn sample(clock: &impl WallClock) -> Result<Self, ClockUnavailable> {
        Ok(Self::from_time(clock.now()?))
    }

    pub fn from_time(t: NaiveTime) -> Self {
        let second = t.second() as f32;
        let minute = t.minute() as f32;
        let hour = (t.hour() % 12) as f32;

        Self {
            hour: (hour + minute / 60.0 + second / 3600.0) * (360.0 / 12.0),
            minute: (minute + second / 60.0) * (360.0 / 60.0),
            second: second * (360.0 / 60.0),
        }
    }

    pub fn angle(&self, hand: Hand) -> f32 {
        match hand {
            Hand::Hour => self.hour,
            Hand::Minute => self.minute,
            Hand::Second => self.second,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> HandAngles {
        HandAngles::from_time(NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    #[test]
    fn reference_time_03_15_30() {
        let a = at(3, 15, 30);
        assert_eq!(a.angle(Hand::Hour), 97.75);
        assert_eq!(a.angle(Hand::Minute), 93.0);
        assert_eq!(a.angle(Hand::Second), 180.0);
    }

    #[test]
    fn angles_stay_in_range() {
        for h in 0..24 {
            for (m, s) in [(0, 0), (30, 30), (59, 59)] {
                let a = at(h, m, s);
                for hand in Hand::ALL {
                    let v = a.angle(hand);
                    assert!((0.0..360.0).contains(&v), "{hand:?} at {h}:{m}:{s} = {v}");
                }
            }
        }
    }

    #[test]
    fn second_angle_is_six_degrees_per_second() {
        for s in 0..60 {
            assert_eq!(at(0, 0, s).angle(Hand::Second), s as f32 * 6.0);
        }
    }

    #[test]
    fn monotonic_within_a_minute() {
        let mut prev = at(10, 41, 0);
        for s in 1..60 {
            let cur = at(10, 41, s);
            for hand in Hand::ALL {
                assert!(cur.angle(hand) >= prev.angle(hand));
            }
            prev = cur;
        }
    }

    #[test]
    fn twenty_four_hour_clock_folds_to_twelve() {
        assert_eq!(at(15, 0, 0).angle(Hand::Hour), at(3, 0, 0).angle(Hand::Hour));
    }

    #[test]
    fn one_second_step_moves_second_hand_six_degrees() {
        let before = at(3, 15, 30);
        let after = at(3, 15, 31);
        assert_eq!(after.angle(Hand::Second) - before.angle(Hand::Second), 6.0);
        // Hour/minute move by sub-visible amounts.
        assert!((after.angle(Hand::Minute) - before.angle(Hand::Minute)).abs() <= 0.1 + 1e-4);
        assert!((after.angle(Hand::Hour) - before.angle(Hand::Hour)).abs() <= 0.01 + 1e-4);
    }
}
