//! Testing utilities for the clinic workspace
//!
//! Shared fixtures plus [`FakeBackend`], an in-memory stand-in for the
//! booking backend that implements both collaborator traits with the
//! backend's own rules and messages.

#![allow(missing_docs)]

use chrono::{Duration, Local, NaiveDateTime};
use clinic_client::{ApiError, AppointmentApi, UserApi};
use clinic_core::validation::format_date_time_for_input;
use clinic_core::{
    Appointment, AppointmentId, AppointmentRequest, AppointmentStatus, Credentials, Department,
    LoginResponse, MessageResponse, RegisterRequest, RegistrationForm, User, UserId, UserUpdate,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub const SAMPLE_PASSWORD: &str = "secret1";

pub fn sample_user() -> User {
    User {
        id: UserId(1),
        username: "jdoe".to_string(),
        email: "jdoe@example.com".to_string(),
        full_name: Some("Jane Doe".to_string()),
        phone_number: Some("5551234567".to_string()),
        address: Some("1 Main St".to_string()),
        role: Some("PATIENT".to_string()),
    }
}

pub fn sample_registration() -> RegistrationForm {
    RegistrationForm {
        username: "newpatient".to_string(),
        email: "newpatient@example.com".to_string(),
        password: SAMPLE_PASSWORD.to_string(),
        full_name: "New Patient".to_string(),
        phone_number: "(555) 987-6543".to_string(),
    }
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Date-time input `days` from now
pub fn future_input(days: i64) -> String {
    format_date_time_for_input(&(now() + Duration::days(days)))
}

/// Date-time input `days` ago
pub fn past_input(days: i64) -> String {
    format_date_time_for_input(&(now() - Duration::days(days)))
}

pub fn sample_appointment(id: i64, user_id: UserId, status: AppointmentStatus) -> Appointment {
    let scheduled = now() + Duration::days(id + 1);
    Appointment {
        id: AppointmentId(id),
        user_id: Some(user_id),
        patient_name: "Jane Doe".to_string(),
        patient_phone: Some("5551234567".to_string()),
        appointment_date: scheduled,
        doctor_name: format!("Dr. Number {id}"),
        department: Some(Department::General),
        reason: Some("Check-up".to_string()),
        status,
        notes: None,
        created_at: Some(now()),
        updated_at: Some(now()),
    }
}

#[derive(Debug, Default)]
struct State {
    users: Vec<(User, String)>,
    appointments: Vec<Appointment>,
    token: Option<String>,
    update_override: Option<User>,
}

impl State {
    fn next_user_id(&self) -> UserId {
        UserId(self.users.iter().map(|(u, _)| u.id.0).max().unwrap_or(0) + 1)
    }

    fn next_appointment_id(&self) -> AppointmentId {
        AppointmentId(self.appointments.iter().map(|a| a.id.0).max().unwrap_or(0) + 1)
    }

    fn user_mut(&mut self, id: UserId) -> Option<&mut (User, String)> {
        self.users.iter_mut().find(|(u, _)| u.id == id)
    }

    fn appointment_mut(&mut self, id: AppointmentId) -> Option<&mut Appointment> {
        self.appointments.iter_mut().find(|a| a.id == id)
    }
}

fn rejected(message: &str) -> ApiError {
    ApiError::Backend {
        status: 400,
        message: message.to_string(),
    }
}

/// In-memory booking backend
///
/// Counts every request it receives, can be taken offline, and can hold
/// profile updates until released.
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<State>,
    requests: AtomicUsize,
    offline: AtomicBool,
    update_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that already knows `user` with `password`
    #[must_use]
    pub fn with_user(self, user: User, password: &str) -> Self {
        self.state.lock().users.push((user, password.to_string()));
        self
    }

    /// Backend seeded with [`sample_user`] / [`SAMPLE_PASSWORD`]
    #[must_use]
    pub fn seeded() -> Self {
        Self::new().with_user(sample_user(), SAMPLE_PASSWORD)
    }

    pub fn add_appointment(&self, appointment: Appointment) {
        self.state.lock().appointments.push(appointment);
    }

    /// Token handed out with every successful login
    pub fn issue_token(&self, token: &str) {
        self.state.lock().token = Some(token.to_string());
    }

    /// Return `user` from the next profile update instead of the patched record
    pub fn override_next_update(&self, user: User) {
        self.state.lock().update_override = Some(user);
    }

    /// Make profile updates wait until the returned handle is notified
    pub fn hold_updates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.update_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// Wake any held updates and stop holding new ones
    pub fn release_updates(&self) {
        if let Some(gate) = self.update_gate.lock().take() {
            gate.notify_waiters();
        }
    }

    /// Fail every request with a 503 until turned back on
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of requests received so far, including failed ones
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.state
            .lock()
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone())
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.state.lock().appointments.clone()
    }

    fn begin(&self) -> Result<(), ApiError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Status { status: 503 });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserApi for FakeBackend {
    async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        self.begin()?;
        let mut state = self.state.lock();
        if state.users.iter().any(|(u, _)| u.username == request.username) {
            return Err(rejected("Username already exists"));
        }
        if state.users.iter().any(|(u, _)| u.email == request.email) {
            return Err(rejected("Email already exists"));
        }

        let user = User {
            id: state.next_user_id(),
            username: request.username.clone(),
            email: request.email.clone(),
            full_name: request.full_name.clone(),
            phone_number: request.phone_number.clone(),
            address: None,
            role: Some("PATIENT".to_string()),
        };
        state.users.push((user.clone(), request.password.clone()));
        Ok(user)
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.begin()?;
        let state = self.state.lock();
        state
            .users
            .iter()
            .find(|(u, p)| u.username == credentials.username && *p == credentials.password)
            .map(|(u, _)| LoginResponse {
                message: Some("Login successful".to_string()),
                user: u.clone(),
                token: state.token.clone(),
            })
            .ok_or_else(|| ApiError::Backend {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
    }

    async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.begin()?;
        self.user(id).ok_or(ApiError::NotFound)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, ApiError> {
        self.begin()?;
        self.state
            .lock()
            .users
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, _)| u.clone())
            .ok_or(ApiError::NotFound)
    }

    async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<User, ApiError> {
        self.begin()?;
        let gate = self.update_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state.lock();
        let email_taken = update.email.as_ref().is_some_and(|email| {
            state
                .users
                .iter()
                .any(|(u, _)| u.id != id && u.email == *email)
        });
        let override_user = state.update_override.take();
        let (user, password) = state.user_mut(id).ok_or_else(|| rejected("User not found"))?;

        if email_taken {
            return Err(rejected("Email already exists"));
        }
        if let Some(new_password) = update.new_password.as_ref().filter(|p| !p.is_empty()) {
            if update.current_password.as_deref() != Some(password.as_str()) {
                return Err(rejected("Current password is incorrect"));
            }
            *password = new_password.clone();
        }
        if let Some(full_name) = &update.full_name {
            user.full_name = Some(full_name.clone());
        }
        if let Some(phone_number) = &update.phone_number {
            user.phone_number = Some(phone_number.clone());
        }
        if let Some(address) = &update.address {
            user.address = Some(address.clone());
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(replacement) = override_user {
            *user = replacement;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: UserId) -> Result<MessageResponse, ApiError> {
        self.begin()?;
        let mut state = self.state.lock();
        let before = state.users.len();
        state.users.retain(|(u, _)| u.id != id);
        if state.users.len() == before {
            return Err(rejected("User not found"));
        }
        Ok(MessageResponse {
            message: "User deleted successfully".to_string(),
        })
    }
}

#[async_trait::async_trait]
impl AppointmentApi for FakeBackend {
    async fn create_appointment(
        &self,
        request: &AppointmentRequest,
    ) -> Result<Appointment, ApiError> {
        self.begin()?;
        if request.appointment_date < now() {
            return Err(rejected("Appointment date must be in the future"));
        }

        let mut state = self.state.lock();
        let conflict = state.appointments.iter().any(|a| {
            a.doctor_name == request.doctor_name
                && a.appointment_date == request.appointment_date
                && a.status != AppointmentStatus::Cancelled
        });
        if conflict {
            return Err(rejected(
                "This time slot is already booked for the selected doctor",
            ));
        }
        if state.user_mut(request.user_id).is_none() {
            return Err(rejected("User not found"));
        }

        let appointment = Appointment {
            id: state.next_appointment_id(),
            user_id: Some(request.user_id),
            patient_name: request.patient_name.clone(),
            patient_phone: request.patient_phone.clone(),
            appointment_date: request.appointment_date,
            doctor_name: request.doctor_name.clone(),
            department: request.department,
            reason: request.reason.clone(),
            status: request.status.unwrap_or_default(),
            notes: request.notes.clone(),
            created_at: Some(now()),
            updated_at: Some(now()),
        };
        state.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn get_appointment(&self, id: AppointmentId) -> Result<Appointment, ApiError> {
        self.begin()?;
        self.state
            .lock()
            .appointment_mut(id)
            .map(|a| a.clone())
            .ok_or(ApiError::NotFound)
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.begin()?;
        Ok(self.appointments())
    }

    async fn list_user_appointments(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Appointment>, ApiError> {
        self.begin()?;
        let state = self.state.lock();
        if !state.users.iter().any(|(u, _)| u.id == user_id) {
            return Err(rejected("User not found"));
        }
        Ok(state
            .appointments
            .iter()
            .filter(|a| a.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn list_appointments_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, ApiError> {
        self.begin()?;
        Ok(self
            .appointments()
            .into_iter()
            .filter(|a| a.status == status)
            .collect())
    }

    async fn update_appointment(
        &self,
        id: AppointmentId,
        request: &AppointmentRequest,
    ) -> Result<Appointment, ApiError> {
        self.begin()?;
        let mut state = self.state.lock();
        let appointment = state
            .appointment_mut(id)
            .ok_or_else(|| rejected("Appointment not found"))?;

        appointment.patient_name = request.patient_name.clone();
        appointment.patient_phone = request.patient_phone.clone();
        appointment.appointment_date = request.appointment_date;
        appointment.doctor_name = request.doctor_name.clone();
        appointment.department = request.department;
        appointment.reason = request.reason.clone();
        if let Some(status) = request.status {
            appointment.status = status;
        }
        appointment.notes = request.notes.clone();
        appointment.updated_at = Some(now());
        Ok(appointment.clone())
    }

    async fn cancel_appointment(&self, id: AppointmentId) -> Result<MessageResponse, ApiError> {
        self.begin()?;
        let mut state = self.state.lock();
        let appointment = state
            .appointment_mut(id)
            .ok_or_else(|| rejected("Appointment not found"))?;
        appointment.status = AppointmentStatus::Cancelled;
        Ok(MessageResponse {
            message: "Appointment cancelled successfully".to_string(),
        })
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<MessageResponse, ApiError> {
        self.begin()?;
        let mut state = self.state.lock();
        let before = state.appointments.len();
        state.appointments.retain(|a| a.id != id);
        if state.appointments.len() == before {
            return Err(rejected("Appointment not found"));
        }
        Ok(MessageResponse {
            message: "Appointment deleted successfully".to_string(),
        })
    }
}
