//! Tracing subscriber setup.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Crate target used for the configured level directive.
const LOG_TARGET: &str = "churn_predictor";

/// Build the filter: `RUST_LOG` first, then the configured level for this crate.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directive = format!("{LOG_TARGET}={}", config.level.trim().to_lowercase());
    let filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .with_context(|| format!("Invalid log level {:?}", config.level))?,
    );
    Ok(filter)
}

/// Install the global tracing subscriber in pretty or JSON format.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(config)?;

    let installed = match config.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_config_level() {
        let config = LoggingConfig {
            level: "DEBUG".to_string(),
            format: "pretty".to_string(),
        };
        assert!(build_env_filter(&config).is_ok());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            format: "pretty".to_string(),
        };
        assert!(build_env_filter(&config).is_err());
    }
}
