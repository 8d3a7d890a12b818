//! Orbiting camera.
//!
//! The camera orbits the dial center on a sphere described by azimuth,
//! elevation and distance. Drags are anchored: every update measures its
//! delta from the point where the drag began, never incrementally from the
//! previous event, so rounding error cannot compound across many small
//! pointer moves.

use glam::{Mat4, Vec2, Vec3};
use gnomon_engine::input::MouseButton;

/// Fixed camera tuning.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Degrees of orbit per logical pixel of drag.
    pub sensitivity: f32,
    /// Distance change per zoom step.
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.4,
            zoom_step: 0.5,
            min_distance: 2.0,
            max_distance: 20.0,
            fov_y_deg: 45.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

/// Active drag bookkeeping.
///
/// Presence of this state is the sole "currently dragging" signal; the
/// angles at drag start are snapshotted so updates are absolute against the
/// anchor.
#[derive(Debug, Copy, Clone)]
struct DragState {
    anchor: Vec2,
    base_azimuth: f32,
    base_elevation: f32,
    button: MouseButton,
}

/// Orbit camera around the scene origin.
#[derive(Debug)]
pub struct OrbitCamera {
    azimuth_deg: f32,
    elevation_deg: f32,
    distance: f32,
    aspect: f32,

    drag: Option<DragState>,
    config: CameraConfig,
}

/// Keep the eye off the poles so `look_at` with a fixed up vector stays
/// well-defined.
const ELEVATION_LIMIT: f32 = 85.0;

impl OrbitCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            azimuth_deg: 0.0,
            // Start looking down onto the dial, matching a wall clock seen
            // slightly from above.
            elevation_deg: 55.0,
            distance: 5.0,
            aspect: 1.0,
            drag: None,
            config,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn azimuth_deg(&self) -> f32 {
        self.azimuth_deg
    }

    pub fn elevation_deg(&self) -> f32 {
        self.elevation_deg
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Begins a drag at `point`.
    ///
    /// Only the left button orbits; presses of other buttons never create
    /// an anchor. A left press while already dragging means the matching
    /// release was lost (e.g. outside the window) and is treated as an
    /// implicit end-then-begin rather than an error.
    pub fn begin_drag(&mut self, button: MouseButton, point: Vec2) {
        if button != MouseButton::Left {
            return;
        }

        if self.drag.is_some() {
            log::debug!("drag begin while dragging; re-anchoring");
        }

        self.drag = Some(DragState {
            anchor: point,
            base_azimuth: self.azimuth_deg,
            base_elevation: self.elevation_deg,
            button,
        });
    }

    /// Updates the orbit angles from the original drag anchor.
    ///
    /// Silently ignored when no drag is active.
    pub fn update_drag(&mut self, point: Vec2) {
        let Some(drag) = self.drag else {
            return;
        };

        let delta = point - drag.anchor;
        self.azimuth_deg = drag.base_azimuth + self.config.sensitivity * delta.x;
        // Screen y grows downward; dragging up raises the camera.
        self.elevation_deg = (drag.base_elevation - self.config.sensitivity * delta.y)
            .clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    /// Ends the drag. No angle change occurs on release itself.
    ///
    /// Releases of buttons other than the one that started the drag are
    /// ignored.
    pub fn end_drag(&mut self, button: MouseButton) {
        if self.drag.is_some_and(|d| d.button == button) {
            self.drag = None;
        }
    }

    /// Moves the camera along the view ray by `steps` zoom increments
    /// (positive = closer). Distance is silently clamped; drag state is
    /// unaffected.
    pub fn zoom(&mut self, steps: f32) {
        self.distance = (self.distance - steps * self.config.zoom_step)
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Incorporates the drawable size; must be called before the next
    /// render after a resize.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Eye position on the orbit sphere.
    fn eye(&self) -> Vec3 {
        let az = self.azimuth_deg.to_radians();
        let el = self.elevation_deg.to_radians();
        self.distance * Vec3::new(el.cos() * az.sin(), el.sin(), el.cos() * az.cos())
    }

    /// View matrix; pure function of the current state.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.config.fov_y_deg.to_radians(), self.aspect, self.config.z_near, self.config.z_far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        let mut cam = OrbitCamera::new(CameraConfig {
            sensitivity: 1.0,
            ..CameraConfig::default()
        });
        cam.azimuth_deg = 0.0;
        cam.elevation_deg = 0.0;
        cam
    }

    #[test]
    fn drag_sequence_is_anchored() {
        let mut cam = camera();

        cam.begin_drag(MouseButton::Left, Vec2::new(0.0, 0.0));
        cam.update_drag(Vec2::new(10.0, 0.0));
        cam.end_drag(MouseButton::Left);

        assert_eq!(cam.azimuth_deg(), 10.0);

        // Zero-length second drag is a no-op.
        cam.begin_drag(MouseButton::Left, Vec2::new(5.0, 5.0));
        cam.update_drag(Vec2::new(5.0, 5.0));
        assert_eq!(cam.azimuth_deg(), 10.0);
    }

    #[test]
    fn updates_measure_from_original_anchor() {
        let mut cam = camera();

        cam.begin_drag(MouseButton::Left, Vec2::new(0.0, 0.0));
        // Many small moves must not compound.
        for x in 1..=10 {
            cam.update_drag(Vec2::new(x as f32, 0.0));
        }
        assert_eq!(cam.azimuth_deg(), 10.0);
    }

    #[test]
    fn update_without_drag_is_ignored() {
        let mut cam = camera();
        cam.update_drag(Vec2::new(100.0, 100.0));
        assert_eq!(cam.azimuth_deg(), 0.0);
        assert_eq!(cam.elevation_deg(), 0.0);
    }

    #[test]
    fn non_left_press_never_anchors() {
        let mut cam = camera();
        cam.begin_drag(MouseButton::Right, Vec2::new(0.0, 0.0));
        assert!(!cam.is_dragging());
        cam.update_drag(Vec2::new(10.0, 0.0));
        assert_eq!(cam.azimuth_deg(), 0.0);
    }

    #[test]
    fn foreign_button_release_does_not_end_drag() {
        let mut cam = camera();
        cam.begin_drag(MouseButton::Left, Vec2::new(0.0, 0.0));
        cam.end_drag(MouseButton::Right);
        assert!(cam.is_dragging());
        cam.update_drag(Vec2::new(4.0, 0.0));
        assert_eq!(cam.azimuth_deg(), 4.0);
    }

    #[test]
    fn begin_while_dragging_re_anchors() {
        let mut cam = camera();

        cam.begin_drag(MouseButton::Left, Vec2::new(0.0, 0.0));
        cam.update_drag(Vec2::new(10.0, 0.0));
        // Release was lost; a fresh press must re-anchor, not extend the
        // old drag.
        cam.begin_drag(MouseButton::Left, Vec2::new(100.0, 0.0));
        cam.update_drag(Vec2::new(103.0, 0.0));
        assert_eq!(cam.azimuth_deg(), 13.0);
    }

    #[test]
    fn zoom_clamps_at_both_ends() {
        let mut cam = camera();
        for _ in 0..1000 {
            cam.zoom(-1.0);
        }
        assert_eq!(cam.distance(), cam.config.max_distance);
        for _ in 0..1000 {
            cam.zoom(1.0);
        }
        assert_eq!(cam.distance(), cam.config.min_distance);
    }

    #[test]
    fn zoom_does_not_disturb_drag() {
        let mut cam = camera();
        cam.begin_drag(MouseButton::Left, Vec2::new(0.0, 0.0));
        cam.zoom(1.0);
        assert!(cam.is_dragging());
        cam.update_drag(Vec2::new(2.0, 0.0));
        assert_eq!(cam.azimuth_deg(), 2.0);
    }

    #[test]
    fn elevation_is_clamped_short_of_poles() {
        let mut cam = camera();
        cam.begin_drag(MouseButton::Left, Vec2::new(0.0, 0.0));
        cam.update_drag(Vec2::new(0.0, -10_000.0));
        assert_eq!(cam.elevation_deg(), ELEVATION_LIMIT);
    }

    #[test]
    fn view_matrix_is_pure() {
        let cam = camera();
        assert_eq!(cam.view_matrix(), cam.view_matrix());
    }
}
