//! Settings resolution
//!
//! Built-in defaults, then the config file, then environment variables,
//! then command-line flags. Later layers win.
//!
//! ```toml
//! [api]
//! base_url = "https://clinic.example.com/api"
//! timeout_secs = 10
//!
//! [session]
//! file = "/var/lib/clinic/session.json"
//! ```

use anyhow::Context;
use clinic_client::{ClientConfig, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_ENV: &str = "CLINIC_CONFIG";
pub(crate) const API_URL_ENV: &str = "CLINIC_API_URL";
pub(crate) const SESSION_FILE_ENV: &str = "CLINIC_SESSION_FILE";

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub(crate) struct Overrides {
    pub(crate) config: Option<PathBuf>,
    pub(crate) api_url: Option<String>,
    pub(crate) session_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api: ClientConfig,
    session: SessionSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SessionSection {
    file: Option<PathBuf>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) client: ClientConfig,
    pub(crate) session_file: PathBuf,
}

impl Settings {
    /// Resolve against the process environment
    pub(crate) fn from_env(overrides: &Overrides) -> anyhow::Result<Self> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve with `env` standing in for the process environment
    pub(crate) fn resolve<F>(overrides: &Overrides, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = overrides
            .config
            .clone()
            .or_else(|| env(CONFIG_ENV).map(PathBuf::from));

        let file = match &config_path {
            Some(path) => load_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => FileSettings::default(),
        };

        let mut client = file.api;
        if let Some(url) = overrides.api_url.clone().or_else(|| env(API_URL_ENV)) {
            client = client.with_base_url(url);
        }
        client.base_url()?;

        let session_file = overrides
            .session_file
            .clone()
            .or_else(|| env(SESSION_FILE_ENV).map(PathBuf::from))
            .or(file.session.file)
            .unwrap_or_else(|| default_session_file(env("HOME").as_deref()));

        tracing::debug!(
            "Using backend {} and session file {}",
            client.base_url,
            session_file.display()
        );
        Ok(Self {
            client,
            session_file,
        })
    }
}

fn load_file(path: &Path) -> Result<FileSettings, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&source)?)
}

fn default_session_file(home: Option<&str>) -> PathBuf {
    match home.filter(|h| !h.is_empty()) {
        Some(home) => Path::new(home).join(".clinic").join("session.json"),
        None => PathBuf::from(".clinic-session.json"),
    }
}
