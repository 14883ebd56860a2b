//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;
use crate::error::ServerError;

/// Build the log filter: `RUST_LOG` if set, else the configured level.
///
/// # Errors
///
/// Returns [`ServerError::Config`] if neither source yields a valid filter.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ServerError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| {
        ServerError::Config(format!("invalid [logging] level {:?}: {e}", config.level))
    })
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns [`ServerError::Config`] for an invalid filter or if a global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), ServerError> {
    let filter = env_filter(config)?;
    let fmt_layer = tracing_subscriber::fmt::layer().with_ansi(config.ansi);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ServerError::Config(format!("tracing subscriber: {e}")))
}
