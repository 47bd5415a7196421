//! reqwest-backed implementation of the collaborator traits
//!
//! One request per call, no retries. Non-success responses are classified
//! by [`ApiError::from_response`].

use crate::api::{AppointmentApi, UserApi};
use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::{ApiError, ConfigError};
use clinic_core::{
    Appointment, AppointmentId, AppointmentRequest, AppointmentStatus, Credentials, LoginResponse,
    MessageResponse, RegisterRequest, User, UserId, UserUpdate,
};
use parking_lot::RwLock;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// REST client for the booking backend
///
/// Clones share the bearer token, so [`HttpClient::set_token`] on one is
/// seen by all of them.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    base_url: Url,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpClient {
    /// Build a client from validated configuration
    ///
    /// # Errors
    /// Invalid base URL, or the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Send `Authorization: Bearer <token>` on every request
    #[inline]
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Arc::new(RwLock::new(Some(token.into())));
        self
    }

    /// Replace or clear the bearer token for this client and its clones
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    /// Bearer token currently sent, if any
    #[inline]
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Base URL requests are resolved against
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<T, ApiError> {
        self.send(endpoint, None::<&()>).await
    }

    async fn call_with<B, T>(&self, endpoint: Endpoint<'_>, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(endpoint, Some(body)).await
    }

    async fn send<B, T>(&self, endpoint: Endpoint<'_>, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let method = endpoint.method();
        let url = endpoint.url(&self.base_url)?;
        tracing::debug!("{} {}", method, url.path());

        let mut request = self.http.request(method.clone(), url);
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let err = ApiError::from_response(status.as_u16(), &bytes);
        tracing::debug!("{} {} failed: {}", method, endpoint.path(), err);
        Err(err)
    }
}

#[async_trait::async_trait]
impl UserApi for HttpClient {
    async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        self.call_with(Endpoint::Register, request).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.call_with(Endpoint::Login, credentials).await
    }

    async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.call(Endpoint::GetUser(id)).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, ApiError> {
        self.call(Endpoint::GetUserByUsername(username)).await
    }

    async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<User, ApiError> {
        self.call_with(Endpoint::UpdateUser(id), update).await
    }

    async fn delete_user(&self, id: UserId) -> Result<MessageResponse, ApiError> {
        self.call(Endpoint::DeleteUser(id)).await
    }
}

#[async_trait::async_trait]
impl AppointmentApi for HttpClient {
    async fn create_appointment(
        &self,
        request: &AppointmentRequest,
    ) -> Result<Appointment, ApiError> {
        self.call_with(Endpoint::CreateAppointment, request).await
    }

    async fn get_appointment(&self, id: AppointmentId) -> Result<Appointment, ApiError> {
        self.call(Endpoint::GetAppointment(id)).await
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.call(Endpoint::ListAppointments).await
    }

    async fn list_user_appointments(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Appointment>, ApiError> {
        self.call(Endpoint::ListUserAppointments(user_id)).await
    }

    async fn list_appointments_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, ApiError> {
        self.call(Endpoint::ListAppointmentsByStatus(status)).await
    }

    async fn update_appointment(
        &self,
        id: AppointmentId,
        request: &AppointmentRequest,
    ) -> Result<Appointment, ApiError> {
        self.call_with(Endpoint::UpdateAppointment(id), request).await
    }

    async fn cancel_appointment(&self, id: AppointmentId) -> Result<MessageResponse, ApiError> {
        self.call(Endpoint::CancelAppointment(id)).await
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<MessageResponse, ApiError> {
        self.call(Endpoint::DeleteAppointment(id)).await
    }
}
