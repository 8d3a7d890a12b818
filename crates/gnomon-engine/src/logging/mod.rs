//! Logging utilities.
//!
//! Centralizes logger initialization. Components log through the standard
//! `log` facade; this module only wires up the `env_logger` backend.

mod init;

pub use init::{init_logging, LoggingConfig};
