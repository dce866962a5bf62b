//! Logging setup for the host binary
//!
//! Log output goes to stderr so that a playlist written to stdout stays
//! clean. `RUST_LOG` takes precedence over the configured level.

use anyhow::{Context, Result};
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::{LogFormat, LoggingConfig};

/// Filter directive used when `RUST_LOG` is not set
pub fn default_filter(level: &str) -> String {
    format!("m3u_transform={}", level.trim().to_ascii_lowercase())
}

/// Install the global subscriber. Fails if one is already installed or the
/// level is not a valid directive.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter(&config.level))
            .with_context(|| format!("invalid log level '{}'", config.level))?,
    };

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .context("failed to initialise logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter("info"), "m3u_transform=info");
        assert_eq!(default_filter(" DEBUG "), "m3u_transform=debug");
    }
}
