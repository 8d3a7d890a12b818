//! Incremental hand rotation.
//!
//! Hand transforms are advanced by composing the per-frame delta rotation
//! onto the accumulated transform rather than rebuilding an absolute pose:
//! the accumulated matrix also carries the object's one-time placement
//! (scale + translate), which is not separable once composed. The cost is a
//! small, bounded floating-point composition error per tick; the benefit is
//! that placement never has to be tracked separately.

use glam::Mat4;

/// Folds the angular difference `current - last` into (-180, 180].
///
/// Without folding, the wrap from ~359° back to ~0° would read as a large
/// negative jump and visibly snap the hand backward; the short path turns it
/// into the ~+1° step it actually is.
pub fn shortest_delta(last: f32, current: f32) -> f32 {
    let mut d = (current - last) % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Rotation advancing a hand by `delta_deg` degrees of dial motion.
///
/// Dial motion is clockwise seen from the canonical camera above the face,
/// which is a negative rotation about +Y in this right-handed scene. The
/// sign is chosen so that increasing time sweeps the hands clockwise; it is
/// verified by the tests below rather than inherited by convention.
pub fn delta_rotation(delta_deg: f32) -> Mat4 {
    Mat4::from_rotation_y(-delta_deg.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4Swizzles};

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        assert!(
            a.abs_diff_eq(b, 1e-5),
            "matrices differ:\n{a:?}\n{b:?}"
        );
    }

    #[test]
    fn plain_step() {
        assert_eq!(shortest_delta(90.0, 96.0), 6.0);
    }

    #[test]
    fn wraparound_folds_to_short_path() {
        // 359° -> 1° is a +2° step, not -358°.
        assert_eq!(shortest_delta(359.0, 1.0), 2.0);
        assert_eq!(shortest_delta(1.0, 359.0), -2.0);
    }

    #[test]
    fn zero_delta_is_identity() {
        assert_eq!(shortest_delta(42.0, 42.0), 0.0);
        assert_mat_eq(delta_rotation(0.0), Mat4::IDENTITY);
    }

    #[test]
    fn half_turn_folds_positive() {
        assert_eq!(shortest_delta(0.0, 180.0), 180.0);
    }

    #[test]
    fn folded_rotation_matches_unfolded_pose() {
        // Folding changes the path, never the resulting orientation.
        assert_mat_eq(delta_rotation(2.0), delta_rotation(-358.0));
    }

    #[test]
    fn positive_delta_sweeps_clockwise_seen_from_above() {
        // A hand pointing at 12 o'clock (toward -Z) advanced by 90° of dial
        // motion must point at 3 o'clock (toward +X) when viewed from +Y.
        let twelve = Vec3::new(0.0, 0.0, -1.0);
        let moved = (delta_rotation(90.0) * twelve.extend(1.0)).xyz();
        assert!(moved.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5), "{moved:?}");
    }

    #[test]
    fn composed_steps_match_one_large_step() {
        let mut acc = Mat4::IDENTITY;
        for _ in 0..30 {
            acc = delta_rotation(6.0) * acc;
        }
        assert_mat_eq(acc, delta_rotation(180.0));
    }
}
