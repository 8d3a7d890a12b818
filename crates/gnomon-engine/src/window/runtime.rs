use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "gnomon".to_string(),
            initial_size: LogicalSize::new(800.0, 800.0),
        }
    }
}

/// Event-loop entry point.
///
/// Single-window by design: the viewer owns exactly one clock and one
/// camera, so there is no window registry to manage.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            slot: None,
            exit_requested: false,
        };

        event_loop
            .run_app(&mut driver)
            .context("winit event loop terminated with error")?;
        Ok(())
    }
}

// The surface inside `Gpu` borrows the window, so the two live together in
// a self-referencing slot. Per-window input and timing state rides along.
#[self_referencing]
struct WindowSlot {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Driver<A: App + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    slot: Option<WindowSlot>,
    exit_requested: bool,
}

impl<A: App + 'static> Driver<A> {
    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(self.config.title.clone())
                    .with_inner_size(self.config.initial_size),
            )
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        self.slot = Some(
            WindowSlotBuilder {
                input_state: InputState::default(),
                input_frame: InputFrame::default(),
                clock: FrameClock::default(),
                window,
                gpu_builder: |w| {
                    pollster::block_on(Gpu::new(w, gpu_init))
                        .expect("GPU initialization failed for window")
                },
            }
            .build(),
        );
        Ok(())
    }

    /// Runs one frame through the app. Split borrows: the app and the slot
    /// are disjoint fields, which lets the app callback run while the slot
    /// is opened through `ouroboros`.
    fn redraw(&mut self, window_id: WindowId) -> AppControl {
        let (app, slot) = (&mut self.app, &mut self.slot);
        let Some(slot) = slot.as_mut() else {
            return AppControl::Continue;
        };

        let mut control = AppControl::Continue;
        slot.with_mut(|fields| {
            let time = fields.clock.tick();

            control = app.on_frame(&mut FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                input: fields.input_state,
                input_frame: fields.input_frame,
                time,
            });

            // The frame has consumed this frame's deltas.
            fields.input_frame.clear();
        });
        control
    }

    fn resize_surface(&mut self) {
        if let Some(slot) = self.slot.as_mut() {
            let size = slot.with_window(|w| w.inner_size());
            slot.with_gpu_mut(|gpu| gpu.resize(size));
            slot.with_window(|w| w.request_redraw());
        }
    }
}

impl<A: App + 'static> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.slot.is_some() {
            return;
        }

        if let Err(e) = self.open_window(event_loop) {
            log::error!("failed to open window: {e:#}");
            event_loop.exit();
            return;
        }

        if let Some(slot) = self.slot.as_ref() {
            slot.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: the second hand advances on wall-clock ticks,
        // so every vsync interval needs a fresh frame.
        if let Some(slot) = self.slot.as_ref() {
            slot.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Feed the input layer first so the frame sees events in arrival
        // order, then let the app observe the raw event.
        let (app, slot) = (&mut self.app, &mut self.slot);
        let mut exit = false;
        if let Some(slot) = slot {
            slot.with_mut(|fields| {
                if let Some(ev) = translate_window_event(fields.window, fields.input_state, &event)
                {
                    fields.input_state.apply_event(fields.input_frame, ev);
                }
                exit = app.on_window_event(window_id, &event) == AppControl::Exit;
            });
        }

        if !exit {
            match &event {
                WindowEvent::CloseRequested => {
                    self.slot = None;
                    exit = true;
                }
                WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                    self.resize_surface();
                }
                WindowEvent::RedrawRequested => {
                    exit = self.redraw(window_id) == AppControl::Exit;
                }
                _ => {}
            }
        }

        if exit {
            self.exit_requested = true;
            event_loop.exit();
        }
    }
}
