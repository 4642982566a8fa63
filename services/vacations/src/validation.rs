//! Input validation utilities
//!
//! Every check here runs before the store is touched, so a rejected request
//! never leaves a partial write behind.

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::models::{
    user::{LoginRequest, RegisterRequest},
    vacation::{NewVacation, VacationPayload},
};

/// Lowest accepted vacation price
pub const MIN_PRICE: f64 = 0.0;
/// Highest accepted vacation price
pub const MAX_PRICE: f64 = 10_000.0;
/// Minimum password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 4;

const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// How the start date of a vacation is checked against the current day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDateRule {
    /// The start date may not be earlier than the given day
    NotBefore(NaiveDate),
    /// Past start dates are accepted
    Unrestricted,
}

/// Validated registration fields
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Validated login fields
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Trimmed value, or `None` when absent or blank
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Email is not valid".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

/// Validate a registration request
pub fn validate_registration(request: RegisterRequest) -> Result<Registration, String> {
    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        present(request.first_name),
        present(request.last_name),
        present(request.email),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ALL_FIELDS_REQUIRED.to_string());
    };

    validate_email(&email)?;
    validate_password(&password)?;

    Ok(Registration {
        first_name,
        last_name,
        email,
        password,
    })
}

/// Validate a login request
pub fn validate_login(request: LoginRequest) -> Result<Credentials, String> {
    let (Some(email), Some(password)) = (
        present(request.email),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ALL_FIELDS_REQUIRED.to_string());
    };

    Ok(Credentials { email, password })
}

/// Price from a JSON number or a numeric string
fn parse_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|p| p.is_finite())
}

/// Calendar date in strict `YYYY-MM-DD` form
fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Validate a vacation create or update body
pub fn validate_vacation(
    payload: VacationPayload,
    start_rule: StartDateRule,
) -> Result<NewVacation, String> {
    let (
        Some(destination),
        Some(description),
        Some(start_date),
        Some(end_date),
        Some(price),
        Some(image_name),
    ) = (
        present(payload.destination),
        present(payload.description),
        present(payload.start_date),
        present(payload.end_date),
        payload.price.filter(|p| !p.is_null()),
        present(payload.image_name),
    )
    else {
        return Err(ALL_FIELDS_REQUIRED.to_string());
    };

    let price = parse_price(&price)
        .filter(|p| (MIN_PRICE..=MAX_PRICE).contains(p))
        .ok_or_else(|| "Price must be between 0 and 10,000".to_string())?;

    let (Some(start_date), Some(end_date)) = (parse_date(&start_date), parse_date(&end_date))
    else {
        return Err("Dates must use the YYYY-MM-DD format".to_string());
    };

    if let StartDateRule::NotBefore(today) = start_rule {
        if start_date < today {
            return Err("Start date cannot be in the past".to_string());
        }
    }

    if end_date < start_date {
        return Err("End date cannot be before start date".to_string());
    }

    Ok(NewVacation {
        destination,
        description,
        start_date,
        end_date,
        price,
        image_name,
    })
}
