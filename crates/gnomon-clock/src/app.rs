//! The clock viewer application.
//!
//! Ties the pieces together per frame: route input to the camera, sample
//! the wall clock and advance the hands, then draw the five objects in
//! scene order.

use glam::Vec2;
use gnomon_engine::core::{App, AppControl, FrameCtx};
use gnomon_engine::input::{
    InputEvent, InputFrame, Key, KeyState, MouseButtonState, MouseWheelDelta,
};
use gnomon_engine::mesh::{Mesh, Texture, Vertex3d};
use gnomon_engine::render::{DepthPolicy, MeshDraw, MeshRenderer, TextureBinding};

use crate::assets::LoadedObject;
use crate::camera::OrbitCamera;
use crate::clock::{HandAngles, WallClock};
use crate::scene::{Scene, SceneObject};

/// Trackpad pixel scrolling is much finer than wheel lines; this many
/// pixels equal one zoom step.
const PIXELS_PER_ZOOM_STEP: f32 = 40.0;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.09,
    b: 0.11,
    a: 1.0,
};

/// GPU-side mirror of the scene, created on the first frame once a device
/// exists. `meshes` is parallel to the scene's object list.
struct GpuScene {
    renderer: MeshRenderer,
    meshes: Vec<(Mesh, TextureBinding)>,
}

pub struct ClockApp<C: WallClock> {
    clock: C,
    scene: Scene,
    camera: OrbitCamera,

    /// CPU-side assets awaiting upload; drained on the first frame.
    pending: Vec<LoadedObject>,
    gpu_scene: Option<GpuScene>,

    clock_warned: bool,
}

impl<C: WallClock> ClockApp<C> {
    /// Builds the app from loaded assets. The scene's draw order follows
    /// the asset list order.
    pub fn new(clock: C, objects: Vec<LoadedObject>, camera: OrbitCamera) -> Self {
        let scene_objects = objects
            .iter()
            .map(|o| SceneObject::new(o.name, o.hand, o.placement))
            .collect();

        Self {
            clock,
            scene: Scene::new(scene_objects, DepthPolicy::ReadWrite),
            camera,
            pending: objects,
            gpu_scene: None,
            clock_warned: false,
        }
    }

    /// Routes this frame's input events, in arrival order.
    ///
    /// Returns `Exit` when the quit key was pressed. Key zoom is one step
    /// per discrete press; OS auto-repeat while the key is held does not
    /// keep zooming.
    fn handle_input(&mut self, frame: &InputFrame) -> AppControl {
        for ev in &frame.events {
            match *ev {
                InputEvent::Key { key: Key::Escape, state: KeyState::Pressed, .. } => {
                    return AppControl::Exit;
                }
                InputEvent::Key { key: Key::W, state: KeyState::Pressed, repeat: false } => {
                    self.camera.zoom(1.0);
                }
                InputEvent::Key { key: Key::S, state: KeyState::Pressed, repeat: false } => {
                    self.camera.zoom(-1.0);
                }
                InputEvent::Key { .. } => {}

                InputEvent::PointerButton(btn) => {
                    let point = Vec2::new(btn.x, btn.y);
                    match btn.state {
                        MouseButtonState::Pressed => self.camera.begin_drag(btn.button, point),
                        MouseButtonState::Released => self.camera.end_drag(btn.button),
                    }
                }
                InputEvent::PointerMoved(mv) => {
                    self.camera.update_drag(Vec2::new(mv.x, mv.y));
                }

                InputEvent::MouseWheel(delta) => {
                    let steps = match delta {
                        MouseWheelDelta::Line { y, .. } => y,
                        MouseWheelDelta::Pixel { y, .. } => y / PIXELS_PER_ZOOM_STEP,
                    };
                    self.camera.zoom(steps);
                }

                InputEvent::PointerLeft | InputEvent::Focused(_) => {}
            }
        }

        AppControl::Continue
    }

    /// Samples the wall clock and advances the hands.
    ///
    /// A failed sample skips animation for this frame, leaving the hands
    /// where they are; the first failure is logged at warn level, repeats
    /// at debug.
    fn tick_clock(&mut self) {
        match HandAngles::sample(&self.clock) {
            Ok(angles) => self.scene.advance_hands(angles),
            Err(err) => {
                if self.clock_warned {
                    log::debug!("{err}; hands frozen");
                } else {
                    log::warn!("{err}; hands frozen until the clock recovers");
                    self.clock_warned = true;
                }
            }
        }
    }

    /// Uploads meshes and textures on the first frame a device is
    /// available.
    fn ensure_uploaded(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.gpu_scene.is_some() {
            return;
        }

        let mut renderer = MeshRenderer::new(self.scene.depth_policy());
        let meshes = std::mem::take(&mut self.pending)
            .into_iter()
            .map(|obj| {
                let vertices: Vec<Vertex3d> = obj
                    .model
                    .vertices
                    .iter()
                    .map(|v| Vertex3d::new(v.position, v.normal, v.uv))
                    .collect();
                let mesh = Mesh::new(device, &vertices, &obj.model.indices);

                let (w, h) = (obj.texture.width(), obj.texture.height());
                let texture = Texture::from_rgba8(device, queue, obj.texture.as_raw(), w, h);
                let binding = renderer.bind_texture(device, &texture);

                (mesh, binding)
            })
            .collect();

        self.gpu_scene = Some(GpuScene { renderer, meshes });
        log::info!("scene uploaded to GPU");
    }
}

impl<C: WallClock> App for ClockApp<C> {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.handle_input(ctx.input_frame) == AppControl::Exit {
            return AppControl::Exit;
        }

        self.tick_clock();
        self.ensure_uploaded(ctx.gpu.device(), ctx.gpu.queue());

        let size = ctx.gpu.size();
        self.camera.set_aspect(size.width, size.height);
        let view_proj = self.camera.view_projection();

        let scene = &self.scene;
        let gpu_scene = &mut self.gpu_scene;

        ctx.render(CLEAR_COLOR, |rctx, target| {
            let Some(gpu) = gpu_scene.as_mut() else {
                return;
            };

            let draws: Vec<MeshDraw<'_>> = scene
                .objects()
                .iter()
                .zip(&gpu.meshes)
                .map(|(obj, (mesh, binding))| MeshDraw {
                    mesh,
                    texture: *binding,
                    model: obj.transform,
                })
                .collect();

            gpu.renderer.render(rctx, target, view_proj, &draws);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockUnavailable;
    use glam::Mat4;

    struct BrokenClock;

    impl WallClock for BrokenClock {
        fn now(&self) -> Result<chrono::NaiveTime, ClockUnavailable> {
            Err(ClockUnavailable)
        }
    }

    #[test]
    fn key_zoom_ignores_os_auto_repeat() {
        let mut app = ClockApp::new(BrokenClock, Vec::new(), OrbitCamera::default());
        let start = app.camera.distance();

        let mut frame = InputFrame::default();
        frame.push_event(InputEvent::Key {
            key: Key::W,
            state: KeyState::Pressed,
            repeat: true,
        });
        assert_eq!(app.handle_input(&frame), AppControl::Continue);
        assert_eq!(app.camera.distance(), start);

        frame.clear();
        frame.push_event(InputEvent::Key {
            key: Key::W,
            state: KeyState::Pressed,
            repeat: false,
        });
        app.handle_input(&frame);
        assert!(app.camera.distance() < start);
    }

    #[test]
    fn clock_failure_freezes_hands() {
        let objects = vec![LoadedObject {
            name: "secondhand",
            hand: Some(crate::clock::Hand::Second),
            placement: Mat4::IDENTITY,
            model: Default::default(),
            texture: image::RgbaImage::new(1, 1),
        }];

        let mut app = ClockApp::new(BrokenClock, objects, OrbitCamera::default());
        app.tick_clock();
        app.tick_clock();
        for obj in app.scene.objects() {
            assert_eq!(obj.transform, Mat4::IDENTITY);
        }
        assert!(app.clock_warned);
    }
}
