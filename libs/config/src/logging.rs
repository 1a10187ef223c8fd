//! Tracing subscriber setup

use crate::LoggingSettings;
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| anyhow!("invalid log level '{}': {}", settings.level, e))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}
