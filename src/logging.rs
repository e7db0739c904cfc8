//! Structured logging.
//!
//! `tracing` with a configurable level and text/json output. The
//! `SOLACE_LOG` environment variable overrides the configured level with a
//! full filter directive.

use crate::config::LoggingSettings;
use crate::error::RegistryError;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize the global subscriber. Call once at startup.
pub fn init(settings: &LoggingSettings) -> Result<(), RegistryError> {
    let filter = build_filter(settings)?;
    let base = Registry::default().with(filter);

    if settings.format == "json" {
        base.with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| RegistryError::internal(format!("failed to init logging: {e}")))?;
    } else {
        base.with(
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| RegistryError::internal(format!("failed to init logging: {e}")))?;
    }

    Ok(())
}

fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, RegistryError> {
    if let Ok(filter) = EnvFilter::try_from_env("SOLACE_LOG") {
        return Ok(filter);
    }

    settings
        .level
        .parse::<EnvFilter>()
        .map_err(|e| RegistryError::internal(format!("invalid log level directive: {e}")))
}
