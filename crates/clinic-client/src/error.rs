//! Error types for the REST client
//!
//! Request failures are either transport-level (connection, TLS, timeout),
//! backend-reported (an `{"error": "..."}` body), or bare statuses.

use serde::Deserialize;
use std::path::PathBuf;

/// Failure of a single REST round trip
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, TLS or timeout failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend rejected the request with a message
    #[error("{message}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Message from the `error` field of the body
        message: String,
    },

    /// 404 without an explanatory body
    #[error("not found")]
    NotFound,

    /// Non-success status without an explanatory body
    #[error("unexpected status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Success status but the body did not match the expected shape
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Base URL cannot carry path segments
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

impl ApiError {
    /// Classify a non-success response from its status and raw body
    #[must_use]
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty());

        match (message, status) {
            (Some(message), _) => Self::Backend { status, message },
            (None, 404) => Self::NotFound,
            (None, _) => Self::Status { status },
        }
    }

    /// HTTP status, when the backend answered
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } | Self::Status { status } => Some(*status),
            Self::NotFound => Some(404),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// Message the backend attached to the failure, if any
    #[inline]
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Backend message, or `fallback` when there is none
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message().unwrap_or(fallback).to_string()
    }

    /// Whether the resource simply does not exist
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Base URL is unusable
    #[error("invalid base url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client could not be built from the settings
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}
