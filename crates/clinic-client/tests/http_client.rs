//! HttpClient Tests
//!
//! Runs the reqwest client against a local warp server that answers the
//! way the booking backend does.

use clinic_client::{ApiError, AppointmentApi, ClientConfig, HttpClient, UserApi};
use clinic_core::prelude::*;
use clinic_core::validation::parse_date_time;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::{Filter, Reply};

fn reply(status: StatusCode, body: &Value) -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "fullName": "Jane Doe",
        "phoneNumber": "5551234567",
        "address": null,
        "role": "PATIENT"
    })
}

fn appointment_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "userId": 3,
        "patientName": "Jane Doe",
        "patientPhone": "5551234567",
        "appointmentDate": "2026-11-02T10:15:00",
        "doctorName": "Dr. Grey",
        "department": "Cardiology",
        "reason": "Check-up",
        "status": status,
        "createdAt": "2026-10-01T08:00:00",
        "updatedAt": "2026-10-01T08:00:00"
    })
}

fn with_fields(mut body: Value, extra: Value) -> Value {
    if let (Some(obj), Value::Object(extra)) = (body.as_object_mut(), extra) {
        obj.extend(extra);
    }
    body
}

fn user_routes() -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone
{
    let login = warp::post()
        .and(warp::path!("api" / "users" / "login"))
        .and(warp::body::json())
        .map(|body: Value| {
            if body["username"] == "jdoe" && body["password"] == "secret1" {
                reply(
                    StatusCode::OK,
                    &json!({
                        "message": "Login successful",
                        "user": user_json(3, "jdoe"),
                        "token": "t0k3n"
                    }),
                )
            } else {
                reply(StatusCode::UNAUTHORIZED, &json!({ "error": "Invalid credentials" }))
            }
        });

    let register = warp::post()
        .and(warp::path!("api" / "users" / "register"))
        .and(warp::body::json())
        .map(|body: Value| {
            let username = body["username"].as_str().unwrap_or_default().to_string();
            if username == "taken" {
                reply(StatusCode::BAD_REQUEST, &json!({ "error": "Username already exists" }))
            } else {
                let user = with_fields(
                    user_json(10, &username),
                    json!({ "email": body["email"], "fullName": body["fullName"] }),
                );
                reply(StatusCode::CREATED, &user)
            }
        });

    let get_user = warp::get()
        .and(warp::path!("api" / "users" / i64))
        .map(|id: i64| {
            if id == 3 {
                reply(StatusCode::OK, &user_json(3, "jdoe"))
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        });

    let by_username = warp::get()
        .and(warp::path!("api" / "users" / "username" / String))
        .map(|name: String| {
            if name == "broken" {
                reply(StatusCode::OK, &json!({ "unexpected": true }))
            } else {
                reply(StatusCode::OK, &user_json(4, &name))
            }
        });

    let update_user = warp::put()
        .and(warp::path!("api" / "users" / i64))
        .and(warp::body::json())
        .map(|id: i64, body: Value| {
            let full_name = body["fullName"].as_str().unwrap_or_default().to_uppercase();
            let user = with_fields(user_json(id, "jdoe"), json!({ "fullName": full_name }));
            reply(StatusCode::OK, &user)
        });

    let delete_user = warp::delete()
        .and(warp::path!("api" / "users" / i64))
        .map(|_id: i64| reply(StatusCode::OK, &json!({ "message": "User deleted successfully" })));

    login
        .or(register)
        .unify()
        .or(get_user)
        .unify()
        .or(by_username)
        .unify()
        .or(update_user)
        .unify()
        .or(delete_user)
        .unify()
}

fn appointment_routes(
) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone {
    let create = warp::post()
        .and(warp::path!("api" / "appointments"))
        .and(warp::body::json())
        .map(|body: Value| {
            if body["doctorName"] == "Dr. Busy" {
                reply(
                    StatusCode::BAD_REQUEST,
                    &json!({ "error": "This time slot is already booked for the selected doctor" }),
                )
            } else {
                let created = with_fields(body, json!({ "id": 100, "status": "SCHEDULED" }));
                reply(StatusCode::CREATED, &created)
            }
        });

    let list = warp::get()
        .and(warp::path!("api" / "appointments"))
        .and(warp::header::optional::<String>("authorization"))
        .map(|auth: Option<String>| match auth.as_deref() {
            Some(header) if header != "Bearer t0k3n" => StatusCode::UNAUTHORIZED.into_response(),
            _ => reply(
                StatusCode::OK,
                &json!([appointment_json(1, "SCHEDULED"), appointment_json(2, "CANCELLED")]),
            ),
        });

    let get = warp::get()
        .and(warp::path!("api" / "appointments" / i64))
        .map(|id: i64| {
            if id == 1 {
                reply(StatusCode::OK, &appointment_json(1, "CONFIRMED"))
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        });

    let by_user = warp::get()
        .and(warp::path!("api" / "appointments" / "user" / i64))
        .map(|user_id: i64| {
            let list = if user_id == 3 {
                json!([appointment_json(1, "SCHEDULED")])
            } else {
                json!([])
            };
            reply(StatusCode::OK, &list)
        });

    let by_status = warp::get()
        .and(warp::path!("api" / "appointments" / "status" / String))
        .map(|status: String| {
            let list = if status == "CANCELLED" {
                json!([appointment_json(2, "CANCELLED")])
            } else {
                json!([])
            };
            reply(StatusCode::OK, &list)
        });

    let update = warp::put()
        .and(warp::path!("api" / "appointments" / i64))
        .and(warp::body::json())
        .map(|id: i64, body: Value| reply(StatusCode::OK, &with_fields(body, json!({ "id": id }))));

    let cancel = warp::put()
        .and(warp::path!("api" / "appointments" / i64 / "cancel"))
        .map(|id: i64| {
            if id == 1 {
                reply(
                    StatusCode::OK,
                    &json!({ "message": "Appointment cancelled successfully" }),
                )
            } else {
                reply(StatusCode::BAD_REQUEST, &json!({ "error": "Appointment not found" }))
            }
        });

    let delete = warp::delete()
        .and(warp::path!("api" / "appointments" / i64))
        .map(|_id: i64| {
            reply(
                StatusCode::OK,
                &json!({ "message": "Appointment deleted successfully" }),
            )
        });

    create
        .or(list)
        .unify()
        .or(get)
        .unify()
        .or(by_user)
        .unify()
        .or(by_status)
        .unify()
        .or(update)
        .unify()
        .or(cancel)
        .unify()
        .or(delete)
        .unify()
}

fn spawn_backend() -> HttpClient {
    let routes = user_routes().or(appointment_routes()).unify();
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let config = ClientConfig::new().with_base_url(format!("http://{addr}/api"));
    HttpClient::new(&config).unwrap()
}

fn booking_request(doctor: &str) -> AppointmentRequest {
    AppointmentRequest {
        user_id: UserId(3),
        patient_name: "Jane Doe".into(),
        patient_phone: None,
        appointment_date: parse_date_time("2026-11-02T10:15").unwrap(),
        doctor_name: doctor.into(),
        department: Some(Department::General),
        reason: Some("Follow-up".into()),
        status: None,
        notes: None,
    }
}

#[tokio::test]
async fn test_login_returns_user_and_token() {
    let client = spawn_backend();

    let response = client
        .login(&Credentials::new("jdoe", "secret1"))
        .await
        .unwrap();

    assert_eq!(response.user.id, UserId(3));
    assert_eq!(response.user.username, "jdoe");
    assert_eq!(response.token.as_deref(), Some("t0k3n"));
}

#[tokio::test]
async fn test_login_failure_surfaces_backend_message() {
    let client = spawn_backend();

    let err = client
        .login(&Credentials::new("jdoe", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.backend_message(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_register_created() {
    let client = spawn_backend();
    let request = RegisterRequest {
        username: "newbie".into(),
        email: "newbie@example.com".into(),
        password: "secret1".into(),
        full_name: Some("New Patient".into()),
        phone_number: None,
    };

    let user = client.register(&request).await.unwrap();
    assert_eq!(user.username, "newbie");
    assert_eq!(user.email, "newbie@example.com");
    assert_eq!(user.full_name.as_deref(), Some("New Patient"));

    let request = RegisterRequest {
        username: "taken".into(),
        ..request
    };
    let err = client.register(&request).await.unwrap_err();
    assert_eq!(err.user_message("Registration failed"), "Username already exists");
}

#[tokio::test]
async fn test_user_lookups() {
    let client = spawn_backend();

    assert_eq!(client.get_user(UserId(3)).await.unwrap().username, "jdoe");
    assert!(client.get_user(UserId(99)).await.unwrap_err().is_not_found());
    assert_eq!(
        client.get_user_by_username("asmith").await.unwrap().username,
        "asmith"
    );
}

#[tokio::test]
async fn test_unexpected_body_is_decode_error() {
    let client = spawn_backend();

    let err = client.get_user_by_username("broken").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_update_user_returns_backend_record() {
    let client = spawn_backend();
    let update = UserUpdate {
        full_name: Some("jane q doe".into()),
        ..UserUpdate::default()
    };

    let user = client.update_user(UserId(3), &update).await.unwrap();
    assert_eq!(user.full_name.as_deref(), Some("JANE Q DOE"));
}

#[tokio::test]
async fn test_delete_user() {
    let client = spawn_backend();
    let response = client.delete_user(UserId(3)).await.unwrap();
    assert_eq!(response.message, "User deleted successfully");
}

#[tokio::test]
async fn test_create_appointment() {
    let client = spawn_backend();

    let created = client
        .create_appointment(&booking_request("Dr. Grey"))
        .await
        .unwrap();
    assert_eq!(created.id, AppointmentId(100));
    assert_eq!(created.status, AppointmentStatus::Scheduled);
    assert_eq!(created.department, Some(Department::General));
    assert_eq!(created.reason.as_deref(), Some("Follow-up"));

    let err = client
        .create_appointment(&booking_request("Dr. Busy"))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "This time slot is already booked for the selected doctor"
    );
}

#[tokio::test]
async fn test_listings() {
    let client = spawn_backend();

    let all = client.list_appointments().await.unwrap();
    assert_eq!(all.len(), 2);

    let mine = client.list_user_appointments(UserId(3)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert!(client
        .list_user_appointments(UserId(8))
        .await
        .unwrap()
        .is_empty());

    let cancelled = client
        .list_appointments_by_status(AppointmentStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let client = spawn_backend();

    assert_eq!(
        client
            .clone()
            .with_token("t0k3n")
            .list_appointments()
            .await
            .unwrap()
            .len(),
        2
    );

    let err = client
        .with_token("stale")
        .list_appointments()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 401 }));
}

#[tokio::test]
async fn test_get_update_cancel_delete() {
    let client = spawn_backend();

    let appointment = client.get_appointment(AppointmentId(1)).await.unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    assert!(matches!(
        client.get_appointment(AppointmentId(2)).await.unwrap_err(),
        ApiError::NotFound
    ));

    let moved = parse_date_time("2026-12-01T08:00").unwrap();
    let request = AppointmentRequest::rescheduled(&appointment, UserId(3), moved);
    let updated = client
        .update_appointment(AppointmentId(1), &request)
        .await
        .unwrap();
    assert_eq!(updated.appointment_date, moved);
    assert_eq!(updated.status, AppointmentStatus::Confirmed);

    let cancelled = client.cancel_appointment(AppointmentId(1)).await.unwrap();
    assert_eq!(cancelled.message, "Appointment cancelled successfully");
    let err = client.cancel_appointment(AppointmentId(5)).await.unwrap_err();
    assert_eq!(err.user_message("Failed to cancel appointment"), "Appointment not found");

    let deleted = client.delete_appointment(AppointmentId(1)).await.unwrap();
    assert_eq!(deleted.message, "Appointment deleted successfully");
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = ClientConfig::new()
        .with_base_url(format!("http://127.0.0.1:{port}/api"))
        .with_timeout_secs(5);
    let client = HttpClient::new(&config).unwrap();

    let err = client.list_appointments().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.user_message("Failed to load appointments"), "Failed to load appointments");
}
