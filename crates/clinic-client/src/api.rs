//! Backend collaborator traits
//!
//! The session holder and user actions talk to the backend only through
//! these traits; [`HttpClient`](crate::HttpClient) is the production
//! implementation.

use crate::error::ApiError;
use clinic_core::{
    Appointment, AppointmentId, AppointmentRequest, AppointmentStatus, Credentials, LoginResponse,
    MessageResponse, RegisterRequest, User, UserId, UserUpdate,
};

/// User account operations
#[async_trait::async_trait]
pub trait UserApi: Send + Sync {
    /// `POST /users/register`
    async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError>;

    /// `POST /users/login`
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// `GET /users/{id}`
    async fn get_user(&self, id: UserId) -> Result<User, ApiError>;

    /// `GET /users/username/{name}`
    async fn get_user_by_username(&self, username: &str) -> Result<User, ApiError>;

    /// `PUT /users/{id}`; the returned record is authoritative
    async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<User, ApiError>;

    /// `DELETE /users/{id}`
    async fn delete_user(&self, id: UserId) -> Result<MessageResponse, ApiError>;
}

/// Appointment operations
#[async_trait::async_trait]
pub trait AppointmentApi: Send + Sync {
    /// `POST /appointments`
    async fn create_appointment(
        &self,
        request: &AppointmentRequest,
    ) -> Result<Appointment, ApiError>;

    /// `GET /appointments/{id}`
    async fn get_appointment(&self, id: AppointmentId) -> Result<Appointment, ApiError>;

    /// `GET /appointments`
    async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError>;

    /// `GET /appointments/user/{userId}`
    async fn list_user_appointments(&self, user_id: UserId)
        -> Result<Vec<Appointment>, ApiError>;

    /// `GET /appointments/status/{status}`
    async fn list_appointments_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, ApiError>;

    /// `PUT /appointments/{id}`
    async fn update_appointment(
        &self,
        id: AppointmentId,
        request: &AppointmentRequest,
    ) -> Result<Appointment, ApiError>;

    /// `PUT /appointments/{id}/cancel`
    async fn cancel_appointment(&self, id: AppointmentId) -> Result<MessageResponse, ApiError>;

    /// `DELETE /appointments/{id}`
    async fn delete_appointment(&self, id: AppointmentId) -> Result<MessageResponse, ApiError>;
}
