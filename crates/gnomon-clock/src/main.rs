//! Real-time 3D analog clock.
//!
//! Loads the five clock objects from disk, opens a window, and renders the
//! dial with hands driven by the local wall clock. Left-drag orbits the
//! camera, the wheel and W/S zoom, Escape quits.

mod animate;
mod app;
mod assets;
mod camera;
mod clock;
mod scene;

use anyhow::{Context, Result};
use gnomon_engine::device::GpuInit;
use gnomon_engine::logging::{init_logging, LoggingConfig};
use gnomon_engine::window::{Runtime, RuntimeConfig};

use app::ClockApp;
use assets::AssetConfig;
use camera::OrbitCamera;
use clock::SystemClock;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = AssetConfig::standard();
    let objects = assets::load(&config)
        .with_context(|| format!("loading clock assets from {}", config.dir.display()))?;
    log::info!("loaded {} clock objects from {}", objects.len(), config.dir.display());

    let app = ClockApp::new(SystemClock, objects, OrbitCamera::default());

    Runtime::run(
        RuntimeConfig {
            title: "gnomon clock".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        app,
    )
}
