//! REST endpoint table
//!
//! Every backend operation as a method plus path segments relative to the
//! configured base URL. Segments are percent-encoded when joined.

use crate::error::ApiError;
use clinic_core::{AppointmentId, AppointmentStatus, UserId};
use reqwest::{Method, Url};
use std::fmt::Display;

/// One backend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Register,
    Login,
    GetUser(UserId),
    GetUserByUsername(&'a str),
    UpdateUser(UserId),
    DeleteUser(UserId),
    CreateAppointment,
    GetAppointment(AppointmentId),
    ListAppointments,
    ListUserAppointments(UserId),
    ListAppointmentsByStatus(AppointmentStatus),
    UpdateAppointment(AppointmentId),
    CancelAppointment(AppointmentId),
    DeleteAppointment(AppointmentId),
}

impl Endpoint<'_> {
    /// HTTP method
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::Register | Self::Login | Self::CreateAppointment => Method::POST,
            Self::GetUser(_)
            | Self::GetUserByUsername(_)
            | Self::GetAppointment(_)
            | Self::ListAppointments
            | Self::ListUserAppointments(_)
            | Self::ListAppointmentsByStatus(_) => Method::GET,
            Self::UpdateUser(_) | Self::UpdateAppointment(_) | Self::CancelAppointment(_) => {
                Method::PUT
            }
            Self::DeleteUser(_) | Self::DeleteAppointment(_) => Method::DELETE,
        }
    }

    /// Unencoded path segments
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        match self {
            Self::Register => segments(&[&"users", &"register"]),
            Self::Login => segments(&[&"users", &"login"]),
            Self::GetUser(id) | Self::UpdateUser(id) | Self::DeleteUser(id) => {
                segments(&[&"users", id])
            }
            Self::GetUserByUsername(name) => segments(&[&"users", &"username", name]),
            Self::CreateAppointment | Self::ListAppointments => segments(&[&"appointments"]),
            Self::GetAppointment(id) | Self::UpdateAppointment(id) | Self::DeleteAppointment(id) => {
                segments(&[&"appointments", id])
            }
            Self::ListUserAppointments(id) => segments(&[&"appointments", &"user", id]),
            Self::ListAppointmentsByStatus(status) => {
                segments(&[&"appointments", &"status", status])
            }
            Self::CancelAppointment(id) => segments(&[&"appointments", id, &"cancel"]),
        }
    }

    /// `/`-joined path, for logs
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }

    /// Absolute URL under `base`
    ///
    /// # Errors
    /// [`ApiError::InvalidUrl`] when the base URL cannot carry path segments.
    pub fn url(&self, base: &Url) -> Result<Url, ApiError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(format!("{base} cannot be a base")))?
            .pop_if_empty()
            .extend(self.segments());
        Ok(url)
    }
}

fn segments(parts: &[&dyn Display]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}
