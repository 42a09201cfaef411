mod backend;
mod bridge;

pub use backend::*;
pub use bridge::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable that overrides `backend.base_url`.
pub const BACKEND_URL_ENV: &str = "TB_BACKEND_URL";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults for missing keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load from file if it exists, otherwise return defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(Error::Io(_)) => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply environment overrides on top of the file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                self.backend.base_url = Some(url.trim().to_owned());
            }
        }
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref url) = self.backend.base_url {
            if !is_http_url(url) {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: "backend.base_url".into(),
                    message: "base_url must start with http:// or https://".into(),
                });
            }
        }

        for (field, url) in [
            ("backend.local_url", &self.backend.local_url),
            ("backend.remote_url", &self.backend.remote_url),
        ] {
            if !is_http_url(url) {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: field.into(),
                    message: "url must start with http:// or https://".into(),
                });
            }
        }

        if self.backend.timeout_ms == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "backend.timeout_ms".into(),
                message: "a zero timeout lets hung requests stay pending forever".into(),
            });
        }

        if self.bridge.namespace.is_empty() || self.bridge.namespace.contains(':') {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "bridge.namespace".into(),
                message: "namespace must be non-empty and must not contain ':'".into(),
            });
        }

        if self.bridge.poll_interval_ms == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "bridge.poll_interval_ms".into(),
                message: "poll interval must be greater than 0".into(),
            });
        }

        errors
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
