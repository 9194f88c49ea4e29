//! Single-field validators.
//!
//! Every validator returns `None` for valid input and `Some(message)` with
//! user-facing text otherwise. None of them fail or panic on bad input.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use validator::ValidateUrl;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());
static UPPERCASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static LOWERCASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());
static DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());

const MIN_PASSWORD_LENGTH: usize = 8;
const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 20;

pub fn validate_email(email: &str) -> Option<String> {
    if email.is_empty() {
        return Some("Email is required".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

/// Checks length, then uppercase, lowercase and digit in that order.
pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Password is required".to_string());
    }
    if text_length(password) < MIN_PASSWORD_LENGTH {
        return Some(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }
    if !UPPERCASE_REGEX.is_match(password) {
        return Some("Password must contain at least one uppercase letter".to_string());
    }
    if !LOWERCASE_REGEX.is_match(password) {
        return Some("Password must contain at least one lowercase letter".to_string());
    }
    if !DIGIT_REGEX.is_match(password) {
        return Some("Password must contain at least one number".to_string());
    }
    None
}

pub fn validate_password_match(password: &str, confirm: &str) -> Option<String> {
    if confirm.is_empty() {
        return Some("Please confirm your password".to_string());
    }
    if password != confirm {
        return Some("Passwords do not match".to_string());
    }
    None
}

pub fn validate_username(username: &str) -> Option<String> {
    if username.is_empty() {
        return Some("Username is required".to_string());
    }
    let length = text_length(username);
    if length < MIN_USERNAME_LENGTH {
        return Some(format!(
            "Username must be at least {MIN_USERNAME_LENGTH} characters"
        ));
    }
    if length > MAX_USERNAME_LENGTH {
        return Some(format!(
            "Username must be no more than {MAX_USERNAME_LENGTH} characters"
        ));
    }
    if !USERNAME_REGEX.is_match(username) {
        return Some(
            "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
        );
    }
    None
}

/// Fails for falsy values (`null`, `false`, `0`, `""`) and blank strings.
pub fn validate_required(value: &Value, label: &str) -> Option<String> {
    let missing = match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    };

    missing.then(|| format!("{label} is required"))
}

/// Decentralized identifiers look like `did:<method>:<id>`.
pub fn validate_did(did: &str) -> Option<String> {
    if did.is_empty() {
        return Some("DID is required".to_string());
    }
    if !did.starts_with("did:") {
        return Some("DID must start with \"did:\"".to_string());
    }
    if did.split(':').count() < 3 {
        return Some("Invalid DID format".to_string());
    }
    None
}

/// Empty is valid: URL fields are optional.
pub fn validate_url(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    if !url.to_string().validate_url() {
        return Some("Please enter a valid URL".to_string());
    }
    None
}

pub fn validate_future_date(date: &str, label: &str) -> Option<String> {
    validate_future_date_on(date, label, Local::now().date_naive())
}

/// Same as [`validate_future_date`] with an explicit "today".
pub(crate) fn validate_future_date_on(date: &str, label: &str, today: NaiveDate) -> Option<String> {
    if date.is_empty() {
        return Some(format!("{label} is required"));
    }
    let Some(parsed) = parse_date(date) else {
        return Some("Please enter a valid date".to_string());
    };
    // Anything before midnight today is in the past
    if parsed.date() < today {
        return Some(format!("{label} cannot be in the past"));
    }
    None
}

pub fn validate_date_range(start: &str, end: &str) -> Option<String> {
    if start.is_empty() || end.is_empty() {
        return Some("Start and end dates are required".to_string());
    }
    let (Some(start), Some(end)) = (parse_date(start), parse_date(end)) else {
        return Some("Please enter valid dates".to_string());
    };
    if end <= start {
        return Some("End date must be after start date".to_string());
    }
    None
}

pub fn validate_json(text: &str) -> Option<String> {
    if text.is_empty() {
        return Some("JSON is required".to_string());
    }
    if serde_json::from_str::<Value>(text).is_err() {
        return Some("Invalid JSON format".to_string());
    }
    None
}

/// Length in UTF-16 code units, the unit browsers use for `maxlength` and
/// `String.length`, so limits agree with web front ends.
pub(crate) fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS]` and RFC 3339 timestamps.
fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(datetime);
        }
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|datetime| datetime.with_timezone(&Local).naive_local())
}
