//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;
use crate::domain::config_types::LogFormat;

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Returns an error
/// if a subscriber has already been installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.to_string()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    installed.map_err(|error| error.to_string())
}
