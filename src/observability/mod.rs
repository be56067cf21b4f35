// src/observability/mod.rs
//! Tracing setup
//!
//! The library only emits `tracing` events and `metrics` counters.
//! Binaries call [`init_tracing`] once; installing a metrics exporter is
//! left to the embedding application.

use crate::utils::config::LoggingConfig;
use crate::utils::errors::{ReporterError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| {
        ReporterError::ConfigError(format!("Failed to install tracing subscriber: {}", e))
    })
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            ReporterError::ConfigError(format!("Invalid log level {:?}: {}", config.level, e))
        }),
    }
}
