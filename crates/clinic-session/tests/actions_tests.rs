use clinic_core::prelude::*;
use clinic_core::{CancellationForm, Field, LoginForm};
use clinic_session::{ActionError, Actions, MemoryStore, SessionError};
use clinic_test_utils::{
    future_input, past_input, sample_appointment, sample_registration, sample_user, FakeBackend,
    SAMPLE_PASSWORD,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn actions_for(backend: &Arc<FakeBackend>) -> Actions {
    let actions = Actions::for_backend(backend.clone(), Arc::new(MemoryStore::new()));
    actions.session().initialize().unwrap();
    actions
}

async fn logged_in() -> (Arc<FakeBackend>, Actions) {
    let backend = Arc::new(FakeBackend::seeded());
    let actions = actions_for(&backend);
    let form = LoginForm {
        username: "jdoe".to_string(),
        password: SAMPLE_PASSWORD.to_string(),
    };
    actions.login(&form).await.unwrap();
    (backend, actions)
}

fn booking(date: String) -> BookingForm {
    BookingForm {
        appointment_date: date,
        doctor_name: "Dr. House".to_string(),
        department: Some(Department::Neurology),
        reason: "Headaches".to_string(),
        ..BookingForm::for_user(&sample_user())
    }
}

#[tokio::test]
async fn test_register_login_then_past_booking_is_rejected_locally() {
    let backend = Arc::new(FakeBackend::new());
    let actions = actions_for(&backend);

    let user = actions
        .register_and_login(&sample_registration())
        .await
        .unwrap();
    assert_eq!(user.username, "newpatient");
    assert_eq!(actions.session().current_user(), Some(user));
    let requests = backend.request_count();
    assert_eq!(requests, 2);

    let err = actions
        .book_appointment(&booking(past_input(1)))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Appointment date must be in the future");
    assert!(matches!(err, ActionError::Invalid(ref e) if e.field == Field::AppointmentDate));
    assert_eq!(backend.request_count(), requests);
    assert!(backend.appointments().is_empty());
}

#[tokio::test]
async fn test_invalid_registration_sends_nothing() {
    let backend = Arc::new(FakeBackend::new());
    let actions = actions_for(&backend);

    let mut form = sample_registration();
    form.password = "12345".to_string();
    let err = actions.register_and_login(&form).await.unwrap_err();
    assert_eq!(err.message(), "Password must be at least 6 characters");
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_duplicate_registration_shows_backend_message() {
    let backend = Arc::new(FakeBackend::seeded());
    let actions = actions_for(&backend);

    let mut form = sample_registration();
    form.username = "jdoe".to_string();
    let err = actions.register_and_login(&form).await.unwrap_err();
    assert_eq!(err.message(), "Username already exists");
    assert!(!actions.session().is_logged_in());
}

#[tokio::test]
async fn test_login_failure_always_shows_generic_message() {
    let backend = Arc::new(FakeBackend::seeded());
    let actions = actions_for(&backend);

    let form = LoginForm {
        username: "jdoe".to_string(),
        password: "nope-nope".to_string(),
    };
    let err = actions.login(&form).await.unwrap_err();
    assert_eq!(err.message(), "Invalid username or password");
    assert!(!actions.session().is_logged_in());
}

#[tokio::test]
async fn test_booking_requires_login() {
    let backend = Arc::new(FakeBackend::seeded());
    let actions = actions_for(&backend);

    let err = actions
        .book_appointment(&booking(future_input(3)))
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::NotLoggedIn));
    assert_eq!(err.message(), "Not logged in");
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_book_and_list_own_appointments() {
    let (backend, actions) = logged_in().await;
    assert!(actions.my_appointments().await.unwrap().is_empty());

    let booked = actions
        .book_appointment(&booking(future_input(3)))
        .await
        .unwrap();
    assert_eq!(booked.user_id, Some(UserId(1)));
    assert_eq!(booked.patient_name, "Jane Doe");
    assert_eq!(booked.status, AppointmentStatus::Scheduled);

    backend.add_appointment(sample_appointment(50, UserId(2), AppointmentStatus::Confirmed));
    let mine = actions.my_appointments().await.unwrap();
    assert_eq!(mine, vec![booked]);
    assert_eq!(actions.all_appointments(None).await.unwrap().len(), 2);
    assert_eq!(
        actions
            .all_appointments(Some(AppointmentStatus::Confirmed))
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_double_booking_shows_backend_message() {
    let (_, actions) = logged_in().await;
    let form = booking(future_input(5));
    actions.book_appointment(&form).await.unwrap();

    let err = actions.book_appointment(&form).await.unwrap_err();
    assert_eq!(
        err.message(),
        "This time slot is already booked for the selected doctor"
    );
}

#[tokio::test]
async fn test_listing_failure_uses_fallback() {
    let (backend, actions) = logged_in().await;
    backend.set_offline(true);

    let err = actions.my_appointments().await.unwrap_err();
    assert_eq!(err.message(), "Failed to load appointments");
}

#[tokio::test]
async fn test_missing_appointment_is_empty_state() {
    let (_, actions) = logged_in().await;
    assert_eq!(actions.appointment(AppointmentId(404)).await.unwrap(), None);
}

#[tokio::test]
async fn test_cancel_flow() {
    let (backend, actions) = logged_in().await;
    backend.add_appointment(sample_appointment(7, UserId(1), AppointmentStatus::Scheduled));
    let requests = backend.request_count();

    let err = actions
        .cancel_appointment(&CancellationForm::new("seven"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Please enter a valid appointment ID");
    assert_eq!(backend.request_count(), requests);

    let ack = actions
        .cancel_appointment(&CancellationForm::new("7"))
        .await
        .unwrap();
    assert_eq!(ack, "Appointment cancelled successfully");
    let cancelled = actions.appointment(AppointmentId(7)).await.unwrap().unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert!(!cancelled.status.is_cancellable());

    let err = actions
        .cancel_appointment(&CancellationForm::new("99"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Appointment not found");
}

#[tokio::test]
async fn test_reschedule_keeps_other_fields() {
    let (backend, actions) = logged_in().await;
    let original = sample_appointment(3, UserId(1), AppointmentStatus::Confirmed);
    backend.add_appointment(original.clone());

    let err = actions
        .reschedule_appointment(AppointmentId(3), &past_input(2))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Appointment date must be in the future");

    let input = future_input(10);
    let moved = actions
        .reschedule_appointment(AppointmentId(3), &input)
        .await
        .unwrap();
    assert_eq!(
        clinic_core::validation::format_date_time_for_input(&moved.appointment_date),
        input
    );
    assert_eq!(moved.doctor_name, original.doctor_name);
    assert_eq!(moved.status, AppointmentStatus::Confirmed);
    assert_eq!(moved.reason, original.reason);
}

#[tokio::test]
async fn test_delete_appointment() {
    let (backend, actions) = logged_in().await;
    backend.add_appointment(sample_appointment(4, UserId(1), AppointmentStatus::Scheduled));

    let ack = actions.delete_appointment(AppointmentId(4)).await.unwrap();
    assert_eq!(ack, "Appointment deleted successfully");
    assert!(backend.appointments().is_empty());

    let err = actions
        .delete_appointment(AppointmentId(4))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Appointment not found");
}

#[tokio::test]
async fn test_edit_profile_updates_session() {
    let (backend, actions) = logged_in().await;

    let mut form = ProfileForm::from_user(&sample_user());
    form.address = "2 Side St".to_string();
    form.current_password = SAMPLE_PASSWORD.to_string();
    form.new_password = "even-better".to_string();
    let user = actions.edit_profile(&form).await.unwrap();

    assert_eq!(user.address.as_deref(), Some("2 Side St"));
    assert_eq!(actions.session().current_user(), Some(user.clone()));
    assert_eq!(backend.user(UserId(1)), Some(user));
}

#[tokio::test]
async fn test_edit_profile_validation_and_backend_errors() {
    let (backend, actions) = logged_in().await;
    let requests = backend.request_count();

    let form = ProfileForm {
        new_password: "newsecret".to_string(),
        ..ProfileForm::from_user(&sample_user())
    };
    let err = actions.edit_profile(&form).await.unwrap_err();
    assert_eq!(err.message(), "Current password is required to change password");
    assert_eq!(backend.request_count(), requests);

    backend.set_offline(true);
    let err = actions
        .edit_profile(&ProfileForm::from_user(&sample_user()))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Failed to update profile");
    assert_eq!(actions.session().current_user(), Some(sample_user()));
}

#[tokio::test]
async fn test_overlapping_profile_edits() {
    let (backend, actions) = logged_in().await;
    backend.hold_updates();
    let before = backend.request_count();

    let first = {
        let actions = actions.clone();
        tokio::spawn(async move {
            actions
                .edit_profile(&ProfileForm::from_user(&sample_user()))
                .await
        })
    };
    while backend.request_count() == before {
        tokio::task::yield_now().await;
    }

    let err = actions
        .edit_profile(&ProfileForm::from_user(&sample_user()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ActionError::Session(SessionError::UpdateInFlight)
    ));

    backend.release_updates();
    assert!(first.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_delete_account_logs_out() {
    let (backend, actions) = logged_in().await;

    let ack = actions.delete_account().await.unwrap();
    assert_eq!(ack, "User deleted successfully");
    assert!(!actions.session().is_logged_in());
    assert_eq!(backend.user(UserId(1)), None);
}

#[tokio::test]
async fn test_user_lookups() {
    let (_, actions) = logged_in().await;

    assert_eq!(actions.user(UserId(1)).await.unwrap(), Some(sample_user()));
    assert_eq!(actions.user(UserId(9)).await.unwrap(), None);
    assert_eq!(
        actions.find_user("jdoe").await.unwrap().map(|u| u.id),
        Some(UserId(1))
    );
    assert_eq!(actions.find_user("ghost").await.unwrap(), None);
}
