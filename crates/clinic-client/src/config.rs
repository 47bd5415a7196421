//! Client configuration
//!
//! Read from TOML or built in code.
//! No request timeout is set unless configured; the transport default
//! applies otherwise.

use crate::error::ConfigError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default backend location
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// REST client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Absolute http(s) URL the endpoint paths are appended to
    pub base_url: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Parse from a TOML document holding the fields at top level
    ///
    /// # Errors
    /// `ConfigError::Parse` for malformed TOML or mistyped fields.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read a TOML file holding the fields at top level
    ///
    /// # Errors
    /// `ConfigError::Io` when unreadable, `ConfigError::Parse` when malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check the base URL and return it parsed
    ///
    /// # Errors
    /// `ConfigError::InvalidUrl` unless the URL is absolute http(s) with a host.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: reason.to_string(),
        };

        let url = Url::parse(self.base_url.trim()).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.cannot_be_a_base() || url.host().is_none() {
            return Err(invalid("url must have a host"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("url must not carry a query or fragment"));
        }
        Ok(url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            user_agent: format!("clinic-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
