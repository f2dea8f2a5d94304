//! User domain models and auth DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use shared::validation::{
    validate_name, validate_password, validate_phone, validate_registration_role,
};

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Volunteer,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Volunteer => write!(f, "volunteer"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "volunteer" => Ok(UserRole::Volunteer),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Request body for user registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_register_passwords", skip_on_field_errors = false))]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,

    pub confirm_password: String,

    #[serde(default)]
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,

    /// Requested role. Only `user` and `volunteer` are grantable here;
    /// admin accounts are never created through registration.
    #[serde(default)]
    #[validate(custom(function = "validate_registration_role"))]
    pub role: Option<String>,
}

fn validate_register_passwords(request: &RegisterRequest) -> Result<(), ValidationError> {
    shared::validation::passwords_match(&request.password, &request.confirm_password)
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User information in responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register_request() -> RegisterRequest {
        serde_json::from_str(
            r#"{
                "name": "Peter Parker",
                "email": "peter@example.com",
                "password": "12345678",
                "confirmPassword": "12345678"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_role_display_roundtrip() {
        for role in [UserRole::User, UserRole::Volunteer, UserRole::Admin] {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(valid_register_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_password_mismatch() {
        let mut req = valid_register_request();
        req.confirm_password = "12345679".to_string();
        let errors = req.validate().unwrap_err();
        let json = serde_json::to_string(&errors).unwrap();
        assert!(json.contains("Passwords do not match"));
    }

    #[test]
    fn test_register_request_short_password() {
        let mut req = valid_register_request();
        req.password = "1234567".to_string();
        req.confirm_password = "1234567".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_alpha_password() {
        let mut req = valid_register_request();
        req.password = "1234567a".to_string();
        req.confirm_password = "1234567a".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_invalid_role() {
        let mut req = valid_register_request();
        req.role = Some("owner".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_admin_role() {
        let mut req = valid_register_request();
        req.role = Some("admin".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_self_service_roles() {
        for role in ["user", "volunteer"] {
            let mut req = valid_register_request();
            req.role = Some(role.to_string());
            assert!(req.validate().is_ok(), "role {} should validate", role);
        }
    }

    #[test]
    fn test_login_request_requires_password() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@x.com","password":""}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
