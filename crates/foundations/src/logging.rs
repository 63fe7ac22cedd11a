//! # Logging
//!
//! Installs the global `tracing` subscriber for host binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Builds the filter directive string from configuration.
#[must_use]
pub fn filter_directives(config: &LoggingConfig) -> String {
    match config.filters.as_deref() {
        Some(filters) if !filters.is_empty() => format!("{},{filters}", config.level),
        _ => config.level.clone(),
    }
}

/// Installs a stdout subscriber. `RUST_LOG` takes precedence over the
/// configured level.
///
/// # Returns
///
/// `false` if a global subscriber was already installed.
pub fn init(config: &LoggingConfig) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
