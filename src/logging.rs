/* src/logging.rs */

use std::io::stdout;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{GeoIpError, Result};

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn setup_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => {
            let formatting_layer = BunyanFormattingLayer::new("iplocate".to_string(), stdout);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(formatting_layer)
                .try_init()
                .map_err(|e| GeoIpError::Config(format!("failed to install logger: {e}")))?;
        }
        LogFormat::Pretty => {
            let format = fmt::format().with_target(true).compact();

            tracing_subscriber::fmt()
                .event_format(format)
                .with_env_filter(env_filter)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .try_init()
                .map_err(|e| GeoIpError::Config(format!("failed to install logger: {e}")))?;
        }
    }

    Ok(())
}
