//! Command handlers
//!
//! Each handler maps its arguments onto a form, runs one action and prints
//! the outcome to stdout.

use clap::ArgMatches;
use clinic_core::validation::format_date_time;
use clinic_core::{
    Appointment, AppointmentId, AppointmentStatus, BookingForm, CancellationForm, Department,
    LoginForm, ProfileForm, RegistrationForm, User, UserId,
};
use clinic_session::Actions;

fn text(args: &ArgMatches, name: &str) -> Option<String> {
    args.get_one::<String>(name).cloned()
}

fn text_or_empty(args: &ArgMatches, name: &str) -> String {
    text(args, name).unwrap_or_default()
}

fn id(args: &ArgMatches) -> i64 {
    args.get_one::<i64>("id").copied().unwrap_or_default()
}

fn print_user(user: &User) {
    println!("#{} {} <{}>", user.id, user.username, user.email);
    if let Some(name) = &user.full_name {
        println!("  name:    {name}");
    }
    if let Some(phone) = &user.phone_number {
        println!("  phone:   {phone}");
    }
    if let Some(address) = &user.address {
        println!("  address: {address}");
    }
    if let Some(role) = &user.role {
        println!("  role:    {role}");
    }
}

pub(crate) fn appointment_line(appointment: &Appointment) -> String {
    let department = appointment
        .department
        .map(|d| format!(" ({d})"))
        .unwrap_or_default();
    format!(
        "#{} {}  {}  {}{}  [{}]",
        appointment.id,
        format_date_time(&appointment.appointment_date),
        appointment.patient_name,
        appointment.doctor_name,
        department,
        appointment.status
    )
}

fn print_appointments(appointments: &[Appointment]) {
    if appointments.is_empty() {
        println!("No appointments found");
        return;
    }
    for appointment in appointments {
        println!("{}", appointment_line(appointment));
    }
}

fn print_appointment(appointment: &Appointment) {
    println!("{}", appointment_line(appointment));
    if let Some(phone) = &appointment.patient_phone {
        println!("  phone:  {phone}");
    }
    if let Some(reason) = &appointment.reason {
        println!("  reason: {reason}");
    }
    if let Some(notes) = &appointment.notes {
        println!("  notes:  {notes}");
    }
    if appointment.status.is_cancellable() {
        println!("  can be cancelled with: clinic cancel {}", appointment.id);
    }
}

/// Run the selected subcommand
pub(crate) async fn run(actions: &Actions, matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("register", args)) => {
            let form = RegistrationForm {
                username: text_or_empty(args, "username"),
                email: text_or_empty(args, "email"),
                password: text_or_empty(args, "password"),
                full_name: text_or_empty(args, "full-name"),
                phone_number: text_or_empty(args, "phone"),
            };
            let user = actions.register_and_login(&form).await?;
            println!("Registered and logged in as {}", user.display_name());
        }
        Some(("login", args)) => {
            let form = LoginForm {
                username: text_or_empty(args, "username"),
                password: text_or_empty(args, "password"),
            };
            let user = actions.login(&form).await?;
            println!("Welcome, {}", user.display_name());
        }
        Some(("logout", _)) => {
            actions.logout()?;
            println!("Logged out");
        }
        Some(("whoami", _)) => match actions.session().current_user() {
            Some(user) => print_user(&user),
            None => println!("Not logged in"),
        },
        Some(("profile", sub)) => run_profile(actions, sub).await?,
        Some(("user", sub)) => run_user(actions, sub).await?,
        Some(("book", args)) => {
            let user = actions
                .session()
                .current_user()
                .ok_or(clinic_session::ActionError::NotLoggedIn)?;
            let mut form = BookingForm::for_user(&user);
            if let Some(name) = text(args, "patient-name") {
                form.patient_name = name;
            }
            if let Some(phone) = text(args, "patient-phone") {
                form.patient_phone = phone;
            }
            form.appointment_date = text_or_empty(args, "date");
            form.doctor_name = text_or_empty(args, "doctor");
            form.department = args.get_one::<Department>("department").copied();
            form.reason = text_or_empty(args, "reason");

            let appointment = actions.book_appointment(&form).await?;
            println!("Booked:");
            print_appointment(&appointment);
        }
        Some(("list", args)) => {
            let status = args.get_one::<AppointmentStatus>("status").copied();
            let appointments = if args.get_flag("all") || status.is_some() {
                actions.all_appointments(status).await?
            } else {
                actions.my_appointments().await?
            };
            print_appointments(&appointments);
        }
        Some(("show", args)) => match actions.appointment(AppointmentId(id(args))).await? {
            Some(appointment) => print_appointment(&appointment),
            None => println!("Appointment not found"),
        },
        Some(("cancel", args)) => {
            let form = CancellationForm::new(text_or_empty(args, "id"));
            println!("{}", actions.cancel_appointment(&form).await?);
        }
        Some(("reschedule", args)) => {
            let date = text_or_empty(args, "date");
            let appointment = actions
                .reschedule_appointment(AppointmentId(id(args)), &date)
                .await?;
            println!("Rescheduled:");
            print_appointment(&appointment);
        }
        Some(("delete", args)) => {
            println!(
                "{}",
                actions.delete_appointment(AppointmentId(id(args))).await?
            );
        }
        _ => {}
    }
    Ok(())
}

async fn run_profile(actions: &Actions, matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("update", args)) => {
            let user = actions
                .session()
                .current_user()
                .ok_or(clinic_session::ActionError::NotLoggedIn)?;
            let mut form = ProfileForm::from_user(&user);
            if let Some(full_name) = text(args, "full-name") {
                form.full_name = full_name;
            }
            if let Some(phone) = text(args, "phone") {
                form.phone_number = phone;
            }
            if let Some(address) = text(args, "address") {
                form.address = address;
            }
            if let Some(email) = text(args, "email") {
                form.email = email;
            }
            form.current_password = text_or_empty(args, "current-password");
            form.new_password = text_or_empty(args, "new-password");

            let user = actions.edit_profile(&form).await?;
            println!("Profile updated");
            print_user(&user);
        }
        Some(("delete", _)) => {
            println!("{}", actions.delete_account().await?);
        }
        _ => {}
    }
    Ok(())
}

async fn run_user(actions: &Actions, matches: &ArgMatches) -> anyhow::Result<()> {
    let found = match matches.subcommand() {
        Some(("get", args)) => actions.user(UserId(id(args))).await?,
        Some(("find", args)) => actions.find_user(&text_or_empty(args, "username")).await?,
        _ => return Ok(()),
    };
    match found {
        Some(user) => print_user(&user),
        None => println!("User not found"),
    }
    Ok(())
}
