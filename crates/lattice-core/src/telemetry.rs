//! Logging initialization.
//!
//! Sets up structured logging with tracing and optional JSON output.

use crate::error::{CoreError, CoreResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global subscriber filtered by `log_level`.
///
/// Fails instead of panicking if a subscriber is already installed.
pub fn init_telemetry(log_level: &str, json_format: bool) -> CoreResult<()> {
    let filter =
        EnvFilter::try_new(log_level).map_err(|e| CoreError::Telemetry(e.to_string()))?;

    let result = if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .try_init()
    };

    result.map_err(|e| CoreError::Telemetry(e.to_string()))
}
