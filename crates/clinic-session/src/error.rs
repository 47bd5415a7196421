//! Error types for clinic session
//!
//! Three layers:
//! - [`StoreError`]: the persistence collaborator failed
//! - [`SessionError`]: a session mutation failed; prior state is untouched
//! - [`ActionError`]: what a user-facing action reports back to the screen

use clinic_client::ApiError;
use clinic_core::ValidationError;
use std::path::PathBuf;

/// Persistence failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Session file could not be read or written
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Session file exists but is not a JSON object of strings
    #[error("session file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Entries could not be serialized for writing
    #[error("failed to encode session file: {0}")]
    Encode(#[source] serde_json::Error),

    /// Finished write could not replace the session file
    #[error("failed to replace session file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Session mutation failure
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Write-through to persistence failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// User record could not be serialized for persistence
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),

    /// Another profile update has not resolved yet
    #[error("a profile update is already in progress")]
    UpdateInFlight,
}

impl SessionError {
    /// Backend error, if that is what failed
    #[inline]
    #[must_use]
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Outcome of a failed user action
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Client-side validation rejected the input; nothing was sent
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The action needs a logged-in user
    #[error("Not logged in")]
    NotLoggedIn,

    /// The backend call failed; `message` is ready to show
    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: ApiError,
    },

    /// Local session state could not be updated
    #[error(transparent)]
    Session(SessionError),
}

impl ActionError {
    /// Wrap a backend failure with its user-facing message
    #[must_use]
    pub fn request(source: ApiError, fallback: &str) -> Self {
        Self::Request {
            message: source.user_message(fallback),
            source,
        }
    }

    /// Wrap a session failure, turning backend errors into requests
    #[must_use]
    pub fn session(err: SessionError, fallback: &str) -> Self {
        match err {
            SessionError::Api(source) => Self::request(source, fallback),
            other => Self::Session(other),
        }
    }

    /// Message to show the user
    #[inline]
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}
