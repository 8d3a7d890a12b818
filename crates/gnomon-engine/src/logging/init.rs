use std::sync::Once;

/// Logger configuration.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// `env_logger` filter string (e.g. "info", "gnomon_engine=debug").
    /// When unset, `RUST_LOG` applies, then the built-in default.
    pub filter: Option<String>,
}

static INIT: Once = Once::new();

/// Installs the global logger. Safe to call more than once; only the first
/// call takes effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                // wgpu's hal layers are chatty at info level; keep the
                // default output focused on the application.
                builder
                    .filter_level(log::LevelFilter::Info)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn)
                    .filter_module("naga", log::LevelFilter::Warn);
            }
        }

        builder.init();
    });
}
