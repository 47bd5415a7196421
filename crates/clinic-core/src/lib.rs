//! Clinic Core
//!
//! Domain model and client-side rules for the clinic booking service.
//!
//! # Overview
//!
//! - **types**: users, appointments and the REST request/response bodies
//! - **validation**: pure predicates and date formatting
//! - **forms**: ordered form rules that turn raw input into requests
//! - **error**: field-tagged validation failures and request fallbacks
//!
//! # Example
//!
//! ```rust
//! use clinic_core::validation;
//! use clinic_core::forms::CancellationForm;
//!
//! assert!(validation::is_valid_email("a@b.com"));
//! assert!(!validation::is_valid_phone("12345"));
//!
//! let err = CancellationForm::new("").validate().unwrap_err();
//! assert_eq!(err.to_string(), "Please enter an appointment ID");
//! ```

#![allow(missing_docs)]

pub mod error;
pub mod forms;
pub mod types;
pub mod validation;

// Re-exports
pub use error::{fallback, Field, ValidationError};
pub use forms::{BookingForm, CancellationForm, LoginForm, ProfileForm, RegistrationForm};
pub use types::{
    Appointment, AppointmentId, AppointmentRequest, AppointmentStatus, Credentials, Department,
    LoginResponse, MessageResponse, RegisterRequest, UnknownTag, User, UserId, UserUpdate,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with clinic records
    pub use crate::{
        Appointment, AppointmentId, AppointmentRequest, AppointmentStatus, BookingForm,
        Credentials, Department, LoginResponse, ProfileForm, RegisterRequest, RegistrationForm,
        User, UserId, UserUpdate, ValidationError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
