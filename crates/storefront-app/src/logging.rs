//! Tracing subscriber bootstrap.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::ConfigError;

/// Environment variable with filter directives, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "STOREFRONT_LOG";

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for log aggregation).
    Json,
    /// Human-readable format.
    #[default]
    Human,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Human => write!(f, "human"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "human" | "text" => Ok(Self::Human),
            other => Err(ConfigError::Invalid(format!("unknown log format: {}", other))),
        }
    }
}

/// Pick filter directives: `STOREFRONT_LOG`, then `RUST_LOG`, then
/// `debug` when verbose, then the configured filter.
pub fn filter_directives(
    config: &LoggingConfig,
    verbose: bool,
    env: impl Fn(&str) -> Option<String>,
) -> String {
    [LOG_ENV, EnvFilter::DEFAULT_ENV]
        .into_iter()
        .find_map(|key| env(key).filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| {
            if verbose {
                "debug".to_string()
            } else {
                config.filter.clone()
            }
        })
}

/// Pick the log format; `--json` overrides the configured one.
pub fn log_format(config: &LoggingConfig, json: bool) -> LogFormat {
    if json {
        LogFormat::Json
    } else {
        config.format
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Fails if the directives do not parse or a subscriber is already set.
pub fn init_logging(
    config: &LoggingConfig,
    verbose: bool,
    json: bool,
) -> Result<(), ConfigError> {
    let directives = filter_directives(config, verbose, |key| std::env::var(key).ok());
    let filter =
        EnvFilter::try_new(&directives).map_err(|e| ConfigError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    match log_format(config, json) {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Human => builder.try_init(),
    }
    .map_err(|e| ConfigError::Logging(e.to_string()))
}
