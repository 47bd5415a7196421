//! Clinic Session
//!
//! Who is logged in, where that survives restarts, and the user-facing
//! flows built on top of it.
//!
//! # Overview
//!
//! - **Session**: current user, restored at start-up, mutated by login,
//!   logout and profile update, written through to a store
//! - **KeyValueStore**: persistence collaborator with memory and file stores
//! - **Actions**: register, log in, book, list, cancel, reschedule, edit
//!   profile; validation first, one request per action
//!
//! # Example
//!
//! ```rust,no_run
//! use clinic_client::{ClientConfig, HttpClient};
//! use clinic_core::LoginForm;
//! use clinic_session::{Actions, FileStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(&ClientConfig::new())?;
//! let actions = Actions::for_backend(Arc::new(client), Arc::new(FileStore::new("session.json")));
//! actions.session().initialize()?;
//!
//! let form = LoginForm {
//!     username: "jdoe".into(),
//!     password: "secret1".into(),
//! };
//! let user = actions.login(&form).await?;
//! println!("Welcome, {}", user.display_name());
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]

pub mod actions;
pub mod error;
pub mod session;
pub mod store;

// Re-exports
pub use actions::Actions;
pub use error::{ActionError, SessionError, StoreError};
pub use session::Session;
pub use store::{Change, FileStore, KeyValueStore, MemoryStore, TOKEN_KEY, USER_KEY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
