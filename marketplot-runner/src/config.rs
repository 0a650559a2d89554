//! Run configuration, read from an optional TOML file.
//!
//! Every key is optional:
//!
//! ```toml
//! output_dir = "assets"
//!
//! [provider]
//! base_url = "https://query2.finance.yahoo.com"
//! timeout_secs = 30
//! max_retries = 2
//!
//! [render]
//! scale = 1.5
//! ```

use marketplot_core::data::YahooConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory PNGs are written to; created on demand.
    pub output_dir: PathBuf,
    pub provider: ProviderConfig,
    pub render: RenderConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("assets"),
            provider: ProviderConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.render.scale.is_finite() && self.render.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "render.scale must be positive, got {}",
                self.render.scale
            )));
        }
        if self.provider.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "provider.timeout_secs must be at least 1".into(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_dir is empty".into()));
        }
        Ok(())
    }
}

/// Market-data provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Absent keeps the HTTP client's default.
    pub timeout_secs: Option<u64>,
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let yahoo = YahooConfig::default();
        Self {
            base_url: yahoo.base_url,
            timeout_secs: None,
            max_retries: yahoo.max_retries,
            user_agent: yahoo.user_agent,
        }
    }
}

impl ProviderConfig {
    pub fn yahoo(&self) -> YahooConfig {
        YahooConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
            max_retries: self.max_retries,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Multiplies every figure's pixel size.
    pub scale: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}
