//! Form rules
//!
//! Each form holds raw user input and validates it in a fixed order,
//! stopping at the first failure. A valid form converts into the request
//! body for its REST operation; an invalid one never reaches the network.

use crate::error::{Field, ValidationError};
use crate::types::{
    AppointmentId, AppointmentRequest, Credentials, Department, RegisterRequest, User, UserId,
    UserUpdate,
};
use crate::validation;
use chrono::{Local, NaiveDateTime};

/// Trimmed value, or `None` when blank
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn require(value: &str, field: Field, message: &str) -> Result<(), ValidationError> {
    if validation::is_required(Some(value)) {
        Ok(())
    } else {
        Err(ValidationError::new(field, message))
    }
}

/// New account sign-up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone_number: String,
}

impl RegistrationForm {
    /// Check username, email and password, in that order
    ///
    /// # Errors
    /// The first failing rule as a [`ValidationError`].
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        if !validation::is_valid_username(&self.username) {
            return Err(ValidationError::new(
                Field::Username,
                "Username must be between 3 and 50 characters",
            ));
        }
        if !validation::is_valid_email(&self.email) {
            return Err(ValidationError::new(Field::Email, "Please enter a valid email"));
        }
        if !validation::is_strong_password(&self.password) {
            return Err(ValidationError::new(
                Field::Password,
                "Password must be at least 6 characters",
            ));
        }

        Ok(RegisterRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            full_name: non_blank(&self.full_name),
            phone_number: non_blank(&self.phone_number),
        })
    }
}

/// Sign-in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    /// A blank username or password.
    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        require(&self.username, Field::Username, "Username is required")?;
        require(&self.password, Field::Password, "Password is required")?;
        Ok(Credentials::new(self.username.trim(), self.password.clone()))
    }
}

/// New appointment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub patient_name: String,
    pub patient_phone: String,
    /// Raw date-time input, typically `YYYY-MM-DDTHH:mm`
    pub appointment_date: String,
    pub doctor_name: String,
    pub department: Option<Department>,
    pub reason: String,
}

impl BookingForm {
    /// Empty form pre-filled with the patient's own name and phone
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self {
            patient_name: user.full_name.clone().unwrap_or_default(),
            patient_phone: user.phone_number.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Validate against the current local time
    ///
    /// # Errors
    /// See [`BookingForm::validate_at`].
    pub fn validate(&self, user_id: UserId) -> Result<AppointmentRequest, ValidationError> {
        self.validate_at(user_id, Local::now().naive_local())
    }

    /// Check patient name, date presence, date in the future, then doctor
    ///
    /// # Errors
    /// The first failing rule as a [`ValidationError`].
    pub fn validate_at(
        &self,
        user_id: UserId,
        now: NaiveDateTime,
    ) -> Result<AppointmentRequest, ValidationError> {
        require(&self.patient_name, Field::PatientName, "Patient name is required")?;
        require(
            &self.appointment_date,
            Field::AppointmentDate,
            "Appointment date is required",
        )?;
        let appointment_date = validation::parse_date_time(&self.appointment_date)
            .filter(|date| *date > now)
            .ok_or_else(|| {
                ValidationError::new(
                    Field::AppointmentDate,
                    "Appointment date must be in the future",
                )
            })?;
        require(&self.doctor_name, Field::DoctorName, "Doctor name is required")?;

        Ok(AppointmentRequest {
            user_id,
            patient_name: self.patient_name.trim().to_string(),
            patient_phone: non_blank(&self.patient_phone),
            appointment_date,
            doctor_name: self.doctor_name.trim().to_string(),
            department: self.department,
            reason: non_blank(&self.reason),
            status: None,
            notes: None,
        })
    }
}

/// Profile edit
///
/// Contact fields are always sent as typed so a blank value clears the
/// stored one; the email is only sent when non-blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub full_name: String,
    pub phone_number: String,
    pub address: String,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
}

impl ProfileForm {
    /// Form pre-filled from the stored profile, password fields blank
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone().unwrap_or_default(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
            address: user.address.clone().unwrap_or_default(),
            email: user.email.clone(),
            ..Self::default()
        }
    }

    /// # Errors
    /// An invalid non-blank email, a new password without the current one,
    /// or a weak new password.
    pub fn validate(&self) -> Result<UserUpdate, ValidationError> {
        let email = non_blank(&self.email);
        if let Some(email) = &email {
            if !validation::is_valid_email(email) {
                return Err(ValidationError::new(Field::Email, "Please enter a valid email"));
            }
        }

        let changes_password = !self.new_password.is_empty();
        if changes_password && self.current_password.is_empty() {
            return Err(ValidationError::new(
                Field::CurrentPassword,
                "Current password is required to change password",
            ));
        }
        if changes_password && !validation::is_strong_password(&self.new_password) {
            return Err(ValidationError::new(
                Field::NewPassword,
                "New password must be at least 6 characters",
            ));
        }

        let (current_password, new_password) = if changes_password {
            (
                Some(self.current_password.clone()),
                Some(self.new_password.clone()),
            )
        } else {
            (None, None)
        };

        Ok(UserUpdate {
            full_name: Some(self.full_name.clone()),
            phone_number: Some(self.phone_number.clone()),
            address: Some(self.address.clone()),
            email,
            current_password,
            new_password,
        })
    }
}

/// Cancel by appointment id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancellationForm {
    pub appointment_id: String,
}

impl CancellationForm {
    #[must_use]
    pub fn new(appointment_id: impl Into<String>) -> Self {
        Self {
            appointment_id: appointment_id.into(),
        }
    }

    /// # Errors
    /// A blank or non-numeric id.
    pub fn validate(&self) -> Result<AppointmentId, ValidationError> {
        require(
            &self.appointment_id,
            Field::AppointmentId,
            "Please enter an appointment ID",
        )?;
        self.appointment_id.parse().map_err(|_| {
            ValidationError::new(Field::AppointmentId, "Please enter a valid appointment ID")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn now() -> NaiveDateTime {
        validation::parse_date_time("2026-10-15T12:00").unwrap()
    }

    fn registration() -> RegistrationForm {
        RegistrationForm {
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            password: "secret1".into(),
            full_name: "Jane Doe".into(),
            phone_number: String::new(),
        }
    }

    fn booking() -> BookingForm {
        BookingForm {
            patient_name: "Jane Doe".into(),
            patient_phone: "555-123-4567".into(),
            appointment_date: "2026-10-20T09:30".into(),
            doctor_name: "Dr. House".into(),
            department: Some(Department::Neurology),
            reason: String::new(),
        }
    }

    #[test]
    fn registration_checks_in_order() {
        let mut form = registration();
        form.username = "ab".into();
        form.email = "bad".into();
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, Field::Username);
        assert_eq!(err.message, "Username must be between 3 and 50 characters");

        let mut form = registration();
        form.email = "jdoe@example".into();
        assert_eq!(form.validate().unwrap_err().message, "Please enter a valid email");

        let mut form = registration();
        form.password = "12345".into();
        assert_eq!(
            form.validate().unwrap_err().message,
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn registration_drops_blank_optional_fields() {
        let request = registration().validate().unwrap();
        assert_eq!(request.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(request.phone_number, None);
        assert_eq!(request.credentials(), Credentials::new("jdoe", "secret1"));
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            username: " ".into(),
            password: "x".into(),
        };
        assert_eq!(form.validate().unwrap_err().message, "Username is required");

        let form = LoginForm {
            username: "jdoe".into(),
            password: String::new(),
        };
        assert_eq!(form.validate().unwrap_err().field, Field::Password);
    }

    #[test]
    fn booking_rejects_past_date() {
        let mut form = booking();
        form.appointment_date = "2026-10-14T09:30".into();
        let err = form.validate_at(UserId(7), now()).unwrap_err();
        assert_eq!(err.field, Field::AppointmentDate);
        assert_eq!(err.message, "Appointment date must be in the future");
    }

    #[test]
    fn booking_rejects_unparseable_date_as_not_future() {
        let mut form = booking();
        form.appointment_date = "next tuesday".into();
        let err = form.validate_at(UserId(7), now()).unwrap_err();
        assert_eq!(err.message, "Appointment date must be in the future");
    }

    #[test]
    fn booking_checks_in_order() {
        let mut form = booking();
        form.patient_name = String::new();
        form.doctor_name = String::new();
        assert_eq!(
            form.validate_at(UserId(7), now()).unwrap_err().message,
            "Patient name is required"
        );

        let mut form = booking();
        form.appointment_date = "  ".into();
        assert_eq!(
            form.validate_at(UserId(7), now()).unwrap_err().message,
            "Appointment date is required"
        );

        let mut form = booking();
        form.doctor_name = String::new();
        assert_eq!(
            form.validate_at(UserId(7), now()).unwrap_err().message,
            "Doctor name is required"
        );
    }

    #[test]
    fn booking_builds_request_for_user() {
        let request = booking().validate_at(UserId(7), now()).unwrap();
        assert_eq!(request.user_id, UserId(7));
        assert_eq!(
            request.appointment_date,
            validation::parse_date_time("2026-10-20T09:30").unwrap()
        );
        assert_eq!(request.patient_phone.as_deref(), Some("555-123-4567"));
        assert_eq!(request.department, Some(Department::Neurology));
        assert_eq!(request.reason, None);
        assert_eq!(request.status, None);
    }

    #[test]
    fn booking_prefills_from_profile() {
        let user = User {
            id: UserId(7),
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            full_name: Some("Jane Doe".into()),
            phone_number: Some("5551234567".into()),
            address: None,
            role: None,
        };
        let form = BookingForm::for_user(&user);
        assert_eq!(form.patient_name, "Jane Doe");
        assert_eq!(form.patient_phone, "5551234567");
        assert!(form.appointment_date.is_empty());
    }

    #[test]
    fn profile_password_rules() {
        let form = ProfileForm {
            new_password: "newsecret".into(),
            ..ProfileForm::default()
        };
        assert_eq!(
            form.validate().unwrap_err().message,
            "Current password is required to change password"
        );

        let form = ProfileForm {
            current_password: "old".into(),
            new_password: "short".into(),
            ..ProfileForm::default()
        };
        assert_eq!(
            form.validate().unwrap_err().message,
            "New password must be at least 6 characters"
        );
    }

    #[test]
    fn profile_only_sends_password_pair_when_changing() {
        let form = ProfileForm {
            full_name: "Jane Q. Doe".into(),
            email: "jane@example.com".into(),
            current_password: "typed-but-unused".into(),
            ..ProfileForm::default()
        };
        let update = form.validate().unwrap();
        assert_eq!(update.full_name.as_deref(), Some("Jane Q. Doe"));
        assert_eq!(update.address.as_deref(), Some(""));
        assert_eq!(update.current_password, None);
        assert_eq!(update.new_password, None);

        let form = ProfileForm {
            current_password: "oldsecret".into(),
            new_password: "newsecret".into(),
            ..ProfileForm::default()
        };
        let update = form.validate().unwrap();
        assert_eq!(update.email, None);
        assert!(update.changes_password());
    }

    #[test]
    fn profile_rejects_bad_email_but_allows_blank() {
        let form = ProfileForm {
            email: "not-an-email".into(),
            ..ProfileForm::default()
        };
        assert_eq!(form.validate().unwrap_err().field, Field::Email);

        let form = ProfileForm::default();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn cancellation_id() {
        assert_eq!(
            CancellationForm::new("").validate().unwrap_err().message,
            "Please enter an appointment ID"
        );
        assert_eq!(
            CancellationForm::new("abc").validate().unwrap_err().message,
            "Please enter a valid appointment ID"
        );
        assert_eq!(CancellationForm::new(" 42 ").validate().unwrap(), AppointmentId(42));
    }
}
