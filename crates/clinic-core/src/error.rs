//! Error types for clinic core
//!
//! Client-side validation failures carry the offending field and the exact
//! message to show inline. Request fallbacks live in [`fallback`].

use std::fmt;

/// Form field a validation failure is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Email,
    Password,
    FullName,
    PhoneNumber,
    Address,
    CurrentPassword,
    NewPassword,
    PatientName,
    PatientPhone,
    AppointmentDate,
    DoctorName,
    Department,
    Reason,
    AppointmentId,
}

impl Field {
    /// Wire/form name of the field
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::FullName => "fullName",
            Field::PhoneNumber => "phoneNumber",
            Field::Address => "address",
            Field::CurrentPassword => "currentPassword",
            Field::NewPassword => "newPassword",
            Field::PatientName => "patientName",
            Field::PatientPhone => "patientPhone",
            Field::AppointmentDate => "appointmentDate",
            Field::DoctorName => "doctorName",
            Field::Department => "department",
            Field::Reason => "reason",
            Field::AppointmentId => "appointmentId",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-detected validation failure
///
/// Displays as the bare message so it can be shown inline as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Field that failed
    pub field: Field,
    /// User-facing message
    pub message: String,
}

impl ValidationError {
    #[inline]
    #[must_use]
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Messages shown when a request fails without a backend-supplied reason
pub mod fallback {
    pub const REGISTRATION: &str = "Registration failed";
    /// Login failures always show this, whatever the backend said
    pub const LOGIN: &str = "Invalid username or password";
    pub const CREATE_APPOINTMENT: &str = "Failed to create appointment";
    pub const LOAD_APPOINTMENTS: &str = "Failed to load appointments";
    pub const LOAD_APPOINTMENT: &str = "Failed to load appointment";
    pub const UPDATE_APPOINTMENT: &str = "Failed to update appointment";
    pub const CANCEL_APPOINTMENT: &str = "Failed to cancel appointment";
    pub const DELETE_APPOINTMENT: &str = "Failed to delete appointment";
    pub const UPDATE_PROFILE: &str = "Failed to update profile";
    pub const LOAD_USER: &str = "Failed to load user";
    pub const DELETE_USER: &str = "Failed to delete account";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_bare_message() {
        let err = ValidationError::new(Field::Email, "Please enter a valid email");
        assert_eq!(err.to_string(), "Please enter a valid email");
        assert_eq!(err.field.as_str(), "email");
    }
}
