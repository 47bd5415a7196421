//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use clinic_core::{AppointmentStatus, Department};
use std::path::PathBuf;

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn department_arg() -> Arg {
    Arg::new("department")
        .long("department")
        .value_parser(|s: &str| s.parse::<Department>().map_err(|e| e.to_string()))
        .help("Cardiology, Dermatology, Neurology, Orthopedics, Pediatrics or General")
}

fn status_arg() -> Arg {
    Arg::new("status")
        .long("status")
        .value_parser(|s: &str| s.parse::<AppointmentStatus>().map_err(|e| e.to_string()))
        .help("SCHEDULED, CONFIRMED, CANCELLED, COMPLETED or NO_SHOW")
}

fn text_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

pub(crate) fn build() -> Command {
    Command::new("clinic")
        .version(clinic_session::VERSION)
        .about("Book and manage clinic appointments")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML config file (default: $CLINIC_CONFIG)"),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .help("Backend base URL (default: $CLINIC_API_URL or http://localhost:8080/api)"),
        )
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Where the logged-in session is kept (default: $CLINIC_SESSION_FILE)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log requests at debug level"),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account and log in")
                .arg(text_arg("username", "3 to 50 characters").required(true))
                .arg(text_arg("email", "Contact email").required(true))
                .arg(text_arg("password", "At least 6 characters").required(true))
                .arg(text_arg("full-name", "Full name"))
                .arg(text_arg("phone", "Phone number")),
        )
        .subcommand(
            Command::new("login")
                .about("Log in")
                .arg(text_arg("username", "Username").required(true))
                .arg(text_arg("password", "Password").required(true)),
        )
        .subcommand(Command::new("logout").about("Forget the logged-in user"))
        .subcommand(Command::new("whoami").about("Show the logged-in user"))
        .subcommand(
            Command::new("profile")
                .about("Manage your profile")
                .subcommand_required(true)
                .subcommand(
                    Command::new("update")
                        .about("Change profile fields; omitted fields keep their value")
                        .arg(text_arg("full-name", "Full name"))
                        .arg(text_arg("phone", "Phone number"))
                        .arg(text_arg("address", "Postal address"))
                        .arg(text_arg("email", "Contact email"))
                        .arg(text_arg("current-password", "Required to change password"))
                        .arg(text_arg("new-password", "At least 6 characters")),
                )
                .subcommand(Command::new("delete").about("Delete your account and log out")),
        )
        .subcommand(
            Command::new("user")
                .about("Look up users")
                .subcommand_required(true)
                .subcommand(Command::new("get").about("User by id").arg(id_arg("User id")))
                .subcommand(
                    Command::new("find")
                        .about("User by username")
                        .arg(Arg::new("username").required(true)),
                ),
        )
        .subcommand(
            Command::new("book")
                .about("Book an appointment")
                .arg(text_arg("date", "YYYY-MM-DDTHH:MM, local time").required(true))
                .arg(text_arg("doctor", "Doctor name").required(true))
                .arg(department_arg())
                .arg(text_arg("reason", "Reason for the visit"))
                .arg(text_arg("patient-name", "Defaults to your full name"))
                .arg(text_arg("patient-phone", "Defaults to your phone number")),
        )
        .subcommand(
            Command::new("list")
                .about("List appointments (yours unless --all or --status)")
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("status")
                        .help("Every appointment"),
                )
                .arg(status_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("Show one appointment")
                .arg(id_arg("Appointment id")),
        )
        .subcommand(
            Command::new("cancel")
                .about("Cancel an appointment")
                .arg(Arg::new("id").required(true).help("Appointment id")),
        )
        .subcommand(
            Command::new("reschedule")
                .about("Move an appointment to a new date")
                .arg(id_arg("Appointment id"))
                .arg(text_arg("date", "YYYY-MM-DDTHH:MM, local time").required(true)),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete an appointment")
                .arg(id_arg("Appointment id")),
        )
}
