//! Global subscriber installation.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::{LOG_ENV, LogConfig};

/// Builds the filter for `config`, preferring a valid `FSENUM_LOG` value.
#[must_use]
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive)
            .unwrap_or_else(|_| EnvFilter::new(config.directive())),
        _ => EnvFilter::new(config.directive()),
    }
}

/// Install a stderr `fmt` subscriber for `config`.
///
/// Returns `false` when a global subscriber was already installed, which makes
/// repeated calls harmless.
///
/// # Example
///
/// ```rust,ignore
/// use logging::{LogConfig, init_tracing};
///
/// init_tracing(&LogConfig::from_verbose_level(2));
/// logging::trace_enum!("enumeration started");
/// ```
pub fn init_tracing(config: &LogConfig) -> bool {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi())
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(layer)
        .try_init()
        .is_ok()
}
