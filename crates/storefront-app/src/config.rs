//! Storefront configuration.
//!
//! Loaded from `storefront.toml` (or a `.json` file) with serde defaults
//! for every field, then overridden by the `API_ORIGIN` environment
//! variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use storefront_data::{RetryPolicy, TimeoutConfig};

use crate::logging::LogFormat;
use crate::ConfigError;

/// Environment variable that replaces `api.origin`.
pub const ORIGIN_ENV: &str = "API_ORIGIN";

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// Storefront configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StorefrontConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse config text; the format follows the file extension.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let parsed = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            toml::from_str(content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Find a config file in `start` or one of its ancestors.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Load the explicit file, else a discovered one, else defaults, then
    /// apply environment overrides and validate.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::discover(cwd) {
                Some(path) => Self::load(&path)?,
                None => Self::default(),
            },
        };

        let config = config.with_origin_override(std::env::var(ORIGIN_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Replace the API origin when an override is present and non-blank.
    pub fn with_origin_override(mut self, origin: Option<String>) -> Self {
        if let Some(origin) = origin.filter(|o| !o.trim().is_empty()) {
            self.api.origin = origin.trim().to_string();
        }
        self
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = &self.api.origin;
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api.origin must be an http(s) URL, got {:?}",
                origin
            )));
        }
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::Invalid("api.timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Base URL of the commerce API.
    pub fn api_base_url(&self) -> String {
        join_url(&self.api.origin, &self.api.base_path)
    }

    /// Base URL product images are served from.
    pub fn cdn_base_url(&self) -> String {
        join_url(&self.api.origin, &self.api.cdn_path)
    }

    pub fn timeout(&self) -> TimeoutConfig {
        TimeoutConfig::from_total(Duration::from_millis(self.api.timeout_ms))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.api.max_retries)
    }
}

fn join_url(origin: &str, path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return origin.trim_end_matches('/').to_string();
    }
    format!("{}/{}", origin.trim_end_matches('/'), path)
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host of the API server.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path of the commerce API under the origin.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Path of product images under the origin.
    #[serde(default = "default_cdn_path")]
    pub cdn_path: String,

    /// Total request timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries for product fetches; orders are never retried.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_origin() -> String {
    "https://larek-api.nomoreparties.co".to_string()
}

fn default_base_path() -> String {
    "/api/weblarek".to_string()
}

fn default_cdn_path() -> String {
    "/content/weblarek".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    2
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            base_path: default_base_path(),
            cdn_path: default_cdn_path(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when no environment filter is set.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

/// Generate a default storefront.toml.
pub fn generate_default_config() -> String {
    r#"# Storefront configuration

[api]
origin = "https://larek-api.nomoreparties.co"
base_path = "/api/weblarek"
cdn_path = "/content/weblarek"
timeout_ms = 10000
max_retries = 2

[logging]
filter = "warn"
format = "human"
"#
    .to_string()
}
