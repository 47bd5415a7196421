//! User-facing actions
//!
//! Each action runs the form rules first and only touches the network when
//! they pass. Backend failures come back as [`ActionError::Request`] with a
//! message ready to show; a missing resource is an empty result, not an
//! error.

use crate::error::{ActionError, SessionError};
use crate::session::Session;
use crate::store::KeyValueStore;
use clinic_client::{ApiError, AppointmentApi, UserApi};
use clinic_core::{
    fallback, validation, Appointment, AppointmentId, AppointmentRequest, AppointmentStatus,
    BookingForm, CancellationForm, Credentials, Field, LoginForm, ProfileForm, RegistrationForm,
    User, UserId, ValidationError,
};
use std::sync::Arc;

/// Screen-level flows over a shared session
#[derive(Clone)]
pub struct Actions {
    session: Arc<Session>,
    users: Arc<dyn UserApi>,
    appointments: Arc<dyn AppointmentApi>,
}

impl std::fmt::Debug for Actions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actions")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Actions {
    #[must_use]
    pub fn new(
        session: Arc<Session>,
        users: Arc<dyn UserApi>,
        appointments: Arc<dyn AppointmentApi>,
    ) -> Self {
        Self {
            session,
            users,
            appointments,
        }
    }

    /// Actions and a fresh session over one backend implementing both traits
    #[must_use]
    pub fn for_backend<B>(backend: Arc<B>, store: Arc<dyn KeyValueStore>) -> Self
    where
        B: UserApi + AppointmentApi + 'static,
    {
        let session = Arc::new(Session::new(backend.clone(), store));
        Self::new(session, backend.clone(), backend)
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn require_user(&self) -> Result<User, ActionError> {
        self.session.current_user().ok_or(ActionError::NotLoggedIn)
    }

    /// Create an account, then log in with the same credentials
    ///
    /// # Errors
    /// Invalid form, or the backend rejects registration or login.
    pub async fn register_and_login(&self, form: &RegistrationForm) -> Result<User, ActionError> {
        let request = form.validate()?;
        self.users
            .register(&request)
            .await
            .map_err(|e| ActionError::request(e, fallback::REGISTRATION))?;
        tracing::info!("Registered {}", request.username);

        self.login_with(&request.credentials()).await
    }

    /// # Errors
    /// Invalid form, or the credentials are refused.
    pub async fn login(&self, form: &LoginForm) -> Result<User, ActionError> {
        let credentials = form.validate()?;
        self.login_with(&credentials).await
    }

    async fn login_with(&self, credentials: &Credentials) -> Result<User, ActionError> {
        self.session.login(credentials).await.map_err(|e| match e {
            // Never reveal which half of the credentials was wrong.
            SessionError::Api(source) => ActionError::Request {
                message: fallback::LOGIN.to_string(),
                source,
            },
            other => ActionError::Session(other),
        })
    }

    /// # Errors
    /// The persisted session cannot be cleared.
    pub fn logout(&self) -> Result<(), ActionError> {
        self.session.logout().map_err(ActionError::Session)
    }

    /// Book for the logged-in user
    ///
    /// # Errors
    /// Not logged in, invalid form, or the backend refuses the booking.
    pub async fn book_appointment(&self, form: &BookingForm) -> Result<Appointment, ActionError> {
        let user = self.require_user()?;
        let request = form.validate(user.id)?;
        let appointment = self
            .appointments
            .create_appointment(&request)
            .await
            .map_err(|e| ActionError::request(e, fallback::CREATE_APPOINTMENT))?;

        tracing::info!(
            "Booked appointment {} with {}",
            appointment.id,
            appointment.doctor_name
        );
        Ok(appointment)
    }

    /// The logged-in user's appointments
    ///
    /// # Errors
    /// Not logged in, or the listing fails.
    pub async fn my_appointments(&self) -> Result<Vec<Appointment>, ActionError> {
        let user = self.require_user()?;
        empty_when_missing(
            self.appointments.list_user_appointments(user.id).await,
            fallback::LOAD_APPOINTMENTS,
        )
    }

    /// Every appointment, optionally only those with `status`
    ///
    /// # Errors
    /// Not logged in, or the listing fails.
    pub async fn all_appointments(
        &self,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, ActionError> {
        self.require_user()?;
        let listed = match status {
            Some(status) => self.appointments.list_appointments_by_status(status).await,
            None => self.appointments.list_appointments().await,
        };
        empty_when_missing(listed, fallback::LOAD_APPOINTMENTS)
    }

    /// # Errors
    /// Not logged in, or the lookup fails for a reason other than absence.
    pub async fn appointment(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, ActionError> {
        self.require_user()?;
        none_when_missing(
            self.appointments.get_appointment(id).await,
            fallback::LOAD_APPOINTMENT,
        )
    }

    /// Cancel by id; returns the backend's acknowledgement
    ///
    /// # Errors
    /// Not logged in, invalid id, or the backend refuses.
    pub async fn cancel_appointment(
        &self,
        form: &CancellationForm,
    ) -> Result<String, ActionError> {
        self.require_user()?;
        let id = form.validate()?;
        let ack = self
            .appointments
            .cancel_appointment(id)
            .await
            .map_err(|e| ActionError::request(e, fallback::CANCEL_APPOINTMENT))?;

        tracing::info!("Cancelled appointment {}", id);
        Ok(ack.message)
    }

    /// Move an appointment to a new date, keeping everything else
    ///
    /// # Errors
    /// Not logged in, a missing or past date, or the backend refuses.
    pub async fn reschedule_appointment(
        &self,
        id: AppointmentId,
        input: &str,
    ) -> Result<Appointment, ActionError> {
        let user = self.require_user()?;
        if !validation::is_required(Some(input)) {
            return Err(
                ValidationError::new(Field::AppointmentDate, "Appointment date is required").into(),
            );
        }
        let date = validation::parse_date_time(input)
            .filter(|_| validation::is_future_date(input))
            .ok_or_else(|| {
                ValidationError::new(
                    Field::AppointmentDate,
                    "Appointment date must be in the future",
                )
            })?;

        let current = self
            .appointments
            .get_appointment(id)
            .await
            .map_err(|e| ActionError::request(e, fallback::LOAD_APPOINTMENT))?;
        let request = AppointmentRequest::rescheduled(&current, user.id, date);
        self.appointments
            .update_appointment(id, &request)
            .await
            .map_err(|e| ActionError::request(e, fallback::UPDATE_APPOINTMENT))
    }

    /// # Errors
    /// Not logged in, or the backend refuses.
    pub async fn delete_appointment(&self, id: AppointmentId) -> Result<String, ActionError> {
        self.require_user()?;
        let ack = self
            .appointments
            .delete_appointment(id)
            .await
            .map_err(|e| ActionError::request(e, fallback::DELETE_APPOINTMENT))?;
        Ok(ack.message)
    }

    /// Validate the profile form and adopt the backend's updated record
    ///
    /// # Errors
    /// Not logged in, invalid form, an update already pending, or the
    /// backend refuses.
    pub async fn edit_profile(&self, form: &ProfileForm) -> Result<User, ActionError> {
        let user = self.require_user()?;
        let update = form.validate()?;
        self.session
            .update_profile(user.id, &update)
            .await
            .map_err(|e| ActionError::session(e, fallback::UPDATE_PROFILE))
    }

    /// Delete the logged-in account and log out
    ///
    /// # Errors
    /// Not logged in, the backend refuses, or the session cannot be cleared.
    pub async fn delete_account(&self) -> Result<String, ActionError> {
        let user = self.require_user()?;
        let ack = self
            .users
            .delete_user(user.id)
            .await
            .map_err(|e| ActionError::request(e, fallback::DELETE_USER))?;
        self.logout()?;
        Ok(ack.message)
    }

    /// # Errors
    /// The lookup fails for a reason other than absence.
    pub async fn user(&self, id: UserId) -> Result<Option<User>, ActionError> {
        none_when_missing(self.users.get_user(id).await, fallback::LOAD_USER)
    }

    /// # Errors
    /// The lookup fails for a reason other than absence.
    pub async fn find_user(&self, username: &str) -> Result<Option<User>, ActionError> {
        none_when_missing(
            self.users.get_user_by_username(username).await,
            fallback::LOAD_USER,
        )
    }
}

fn empty_when_missing<T>(
    result: Result<Vec<T>, ApiError>,
    fallback: &str,
) -> Result<Vec<T>, ActionError> {
    match result {
        Ok(items) => Ok(items),
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        Err(e) => Err(ActionError::request(e, fallback)),
    }
}

fn none_when_missing<T>(
    result: Result<T, ApiError>,
    fallback: &str,
) -> Result<Option<T>, ActionError> {
    match result {
        Ok(item) => Ok(Some(item)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(ActionError::request(e, fallback)),
    }
}
