//! Clock scene state.
//!
//! The scene is a fixed, ordered list of five objects. Draw order is part of
//! the scene definition: the face is submitted first and the second hand
//! last, so that with depth testing disabled the hands still paint over the
//! dial.

use glam::Mat4;
use gnomon_engine::render::DepthPolicy;

use crate::animate::{delta_rotation, shortest_delta};
use crate::clock::{Hand, HandAngles};

/// One drawable object of the clock.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: &'static str,
    /// Which hand this object follows, if any. The face and markings are
    /// static.
    pub hand: Option<Hand>,
    /// Accumulated model transform. Starts as the one-time placement and
    /// absorbs every subsequent delta rotation.
    pub transform: Mat4,
    /// Angle this object was last advanced to, in dial degrees.
    last_angle: f32,
}

impl SceneObject {
    pub fn new(name: &'static str, hand: Option<Hand>, placement: Mat4) -> Self {
        Self {
            name,
            hand,
            transform: placement,
            // Meshes are authored pointing at 12 o'clock, i.e. dial angle
            // zero, so the first advance poses the hand at the current time
            // in one step.
            last_angle: 0.0,
        }
    }
}

/// The five clock objects in draw order.
#[derive(Debug)]
pub struct Scene {
    objects: Vec<SceneObject>,
    depth: DepthPolicy,
}

impl Scene {
    pub fn new(objects: Vec<SceneObject>, depth: DepthPolicy) -> Self {
        Self { objects, depth }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn depth_policy(&self) -> DepthPolicy {
        self.depth
    }

    /// Rotates each hand object from its last known angle to the angle in
    /// `angles`, leaving static objects untouched.
    ///
    /// The delta is folded onto the short path first, so the minute-boundary
    /// wrap of the second hand (≈359° back to ≈0°) advances forward instead
    /// of sweeping backward through the dial.
    pub fn advance_hands(&mut self, angles: HandAngles) {
        for obj in &mut self.objects {
            let Some(hand) = obj.hand else {
                continue;
            };

            let current = angles.angle(hand);
            let delta = shortest_delta(obj.last_angle, current);
            if delta != 0.0 {
                obj.transform = delta_rotation(delta) * obj.transform;
            }
            obj.last_angle = current;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use glam::{Vec3, Vec4Swizzles};

    fn test_scene() -> Scene {
        Scene::new(
            vec![
                SceneObject::new("clockface", None, Mat4::IDENTITY),
                SceneObject::new("clocklines", None, Mat4::IDENTITY),
                SceneObject::new("hourhand", Some(Hand::Hour), Mat4::IDENTITY),
                SceneObject::new("minutehand", Some(Hand::Minute), Mat4::IDENTITY),
                SceneObject::new("secondhand", Some(Hand::Second), Mat4::IDENTITY),
            ],
            DepthPolicy::ReadWrite,
        )
    }

    fn angles_at(h: u32, m: u32, s: u32) -> HandAngles {
        HandAngles::from_time(NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    fn tip(obj: &SceneObject) -> Vec3 {
        // Where a 12-o'clock-pointing unit tip ends up under the object's
        // current transform.
        (obj.transform * Vec3::new(0.0, 0.0, -1.0).extend(1.0)).xyz()
    }

    #[test]
    fn draw_order_is_stable() {
        let mut scene = test_scene();
        let names: Vec<_> = scene.objects().iter().map(|o| o.name).collect();
        scene.advance_hands(angles_at(3, 15, 30));
        let after: Vec<_> = scene.objects().iter().map(|o| o.name).collect();
        assert_eq!(names, after);
        assert_eq!(
            names,
            ["clockface", "clocklines", "hourhand", "minutehand", "secondhand"]
        );
    }

    #[test]
    fn static_objects_never_move() {
        let mut scene = test_scene();
        scene.advance_hands(angles_at(3, 15, 30));
        scene.advance_hands(angles_at(9, 59, 59));
        for obj in scene.objects().iter().filter(|o| o.hand.is_none()) {
            assert_eq!(obj.transform, Mat4::IDENTITY, "{} moved", obj.name);
        }
    }

    #[test]
    fn first_advance_poses_hands_at_current_time() {
        let mut scene = test_scene();
        scene.advance_hands(angles_at(0, 0, 15));
        // 15 s = 90° of dial motion: the second hand tip points at 3
        // o'clock (+X).
        let second = &scene.objects()[4];
        assert!(tip(second).abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn equal_angles_leave_transforms_bitwise_identical() {
        let mut scene = test_scene();
        scene.advance_hands(angles_at(3, 15, 30));
        let before: Vec<_> = scene.objects().iter().map(|o| o.transform).collect();
        scene.advance_hands(angles_at(3, 15, 30));
        let after: Vec<_> = scene.objects().iter().map(|o| o.transform).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn minute_wrap_steps_forward() {
        let mut scene = test_scene();
        scene.advance_hands(angles_at(0, 0, 59));
        let before = tip(&scene.objects()[4]);
        scene.advance_hands(angles_at(0, 1, 0));
        let after = tip(&scene.objects()[4]);
        // 59 s sits just left of 12; one tick later the hand is back at 12
        // having crossed it, not swept the long way around.
        assert!(before.x < 0.0);
        assert!(after.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-4), "{after:?}");
    }

    #[test]
    fn incremental_ticks_match_direct_pose() {
        let mut ticked = test_scene();
        for s in 0..=30 {
            ticked.advance_hands(angles_at(3, 15, s));
        }
        let mut direct = test_scene();
        direct.advance_hands(angles_at(3, 15, 30));

        for (a, b) in ticked.objects().iter().zip(direct.objects()) {
            assert!(
                a.transform.abs_diff_eq(b.transform, 1e-4),
                "{} diverged:\n{:?}\n{:?}",
                a.name,
                a.transform,
                b.transform
            );
        }
    }
}
