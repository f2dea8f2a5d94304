//! Common validation utilities.
//!
//! Field-level input rules applied before a request reaches domain logic.
//! Each function returns a `validator::ValidationError` carrying a
//! user-facing message, so failures aggregate into the standard per-field
//! error response.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Minimum length of a person's name after trimming.
const NAME_MIN_LENGTH: usize = 2;

/// Maximum length of a person's name after trimming.
const NAME_MAX_LENGTH: usize = 50;

lazy_static! {
    static ref PASSWORD_RE: Regex = Regex::new(r"^[0-9]{8}$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

/// Validates that a password is exactly eight numeric digits after trimming.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if PASSWORD_RE.is_match(password.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_format");
        err.message = Some("Password must be exactly 8 digits".into());
        Err(err)
    }
}

/// Validates that a phone number is exactly ten numeric digits after trimming.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone number must be exactly 10 digits".into());
        Err(err)
    }
}

/// Validates that a name is 2-50 characters of letters and whitespace.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();

    if len < NAME_MIN_LENGTH || len > NAME_MAX_LENGTH {
        let mut err = ValidationError::new("name_length");
        err.message = Some("Name must be between 2 and 50 characters".into());
        return Err(err);
    }

    if !trimmed.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        let mut err = ValidationError::new("name_charset");
        err.message = Some("Name may only contain letters and spaces".into());
        return Err(err);
    }

    Ok(())
}

/// Validates a role requested at registration time.
///
/// Self-service accounts are limited to `user` and `volunteer`; admin
/// accounts are provisioned directly, never through the public
/// registration endpoint.
pub fn validate_registration_role(role: &str) -> Result<(), ValidationError> {
    match role {
        "user" | "volunteer" => Ok(()),
        _ => {
            let mut err = ValidationError::new("role_invalid");
            err.message = Some("Role must be one of: user, volunteer".into());
            Err(err)
        }
    }
}

/// Validates that the confirmation password matches the password verbatim.
///
/// Intended for struct-level validation so the error cites the
/// `confirmPassword` field.
pub fn passwords_match(password: &str, confirm_password: &str) -> Result<(), ValidationError> {
    if password == confirm_password {
        Ok(())
    } else {
        let mut err = ValidationError::new("passwords_mismatch");
        err.message = Some("Passwords do not match".into());
        Err(err)
    }
}
