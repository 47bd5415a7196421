//! Validation predicates and date formatting
//!
//! Pure functions over primitive inputs. None of them panic or return
//! errors: malformed input yields `false` or an empty string, and the caller
//! decides which message to show.
//!
//! Date inputs are wall-clock local times. Accepted shapes:
//! - RFC 3339 with an offset (converted to local time)
//! - `YYYY-MM-DDTHH:mm`, optionally with seconds and a fraction
//! - the same with a space instead of `T`
//! - a bare `YYYY-MM-DD` (local midnight)

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Username length bounds (inclusive)
pub const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;

/// Digit count bounds for phone numbers (inclusive)
pub const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 10..=15;

/// `YYYY-MM-DDTHH:mm` as used by date-time input controls
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// en-US medium date with a two-digit 12-hour clock
pub const DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// `local@domain.tld` shape check
///
/// No whitespace, exactly one `@`, and a `.` after it with text on both
/// sides. Not RFC 5322 complete.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 10 to 15 digits once dashes, whitespace and parentheses are stripped
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')')))
        .collect();

    PHONE_DIGITS.contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Length is the only strength criterion
#[must_use]
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_LEN.contains(&username.chars().count())
}

/// Fails on a missing value or one that is empty after trimming
#[must_use]
pub fn is_required<S: AsRef<str>>(value: Option<S>) -> bool {
    value.is_some_and(|v| !v.as_ref().trim().is_empty())
}

/// True iff `input` parses and is strictly after the current local time
#[must_use]
pub fn is_future_date(input: &str) -> bool {
    is_future_date_at(input, Local::now().naive_local())
}

/// [`is_future_date`] against an explicit clock reading
#[must_use]
pub fn is_future_date_at(input: &str, now: NaiveDateTime) -> bool {
    parse_date_time(input).is_some_and(|date| date > now)
}

/// Parse any accepted date shape into a local wall-clock time
#[must_use]
pub fn parse_date_time(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(zoned) = DateTime::parse_from_rfc3339(input) {
        return Some(zoned.with_timezone(&Local).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Human-readable date-time, e.g. `Oct 15, 2026, 02:30 PM`
///
/// Empty for empty or unparseable input.
#[must_use]
pub fn format_date(input: &str) -> String {
    parse_date_time(input)
        .map(|date| format_date_time(&date))
        .unwrap_or_default()
}

#[must_use]
pub fn format_date_time(date: &NaiveDateTime) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Zero-padded `YYYY-MM-DDTHH:mm`
///
/// Empty for empty or unparseable input.
#[must_use]
pub fn format_date_for_input(input: &str) -> String {
    parse_date_time(input)
        .map(|date| format_date_time_for_input(&date))
        .unwrap_or_default()
}

#[must_use]
pub fn format_date_time_for_input(date: &NaiveDateTime) -> String {
    date.format(INPUT_FORMAT).to_string()
}
