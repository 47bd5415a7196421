//! Clinic Client
//!
//! REST access to the clinic booking backend.
//!
//! # Overview
//!
//! - **UserApi / AppointmentApi**: collaborator traits, one method per endpoint
//! - **HttpClient**: reqwest implementation of both traits
//! - **ClientConfig**: base URL, optional timeout, user agent
//! - **ApiError**: transport, backend-reported and bare-status failures
//!
//! # Example
//!
//! ```rust,no_run
//! use clinic_client::{AppointmentApi, ClientConfig, HttpClient};
//! use clinic_core::UserId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new().with_base_url("http://localhost:8080/api");
//! let client = HttpClient::new(&config)?;
//!
//! let appointments = client.list_user_appointments(UserId(3)).await?;
//! println!("{} appointments", appointments.len());
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]

pub mod api;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;

// Re-exports
pub use api::{AppointmentApi, UserApi};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use endpoint::Endpoint;
pub use error::{ApiError, ConfigError};
pub use http::HttpClient;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
