use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::services::authorization::AccessDenied;
use domain::services::lifecycle::InvalidTransition;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Validation error: {0}")]
    Validation(String, Vec<ValidationDetail>),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Validation failure without per-field detail.
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into(), Vec::new())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::PreconditionFailed(msg) => (
                StatusCode::PRECONDITION_FAILED,
                "precondition_failed",
                msg,
                None,
            ),
            ApiError::InvalidTransition(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_transition",
                msg,
                None,
            ),
            ApiError::Validation(msg, details) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                msg,
                if details.is_empty() {
                    None
                } else {
                    Some(details)
                },
            ),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
                None,
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Field ordering for validation responses, matching the order fields
/// appear in the request shapes. Unlisted fields sort after these,
/// alphabetically; schema-level errors (`__all__`) come last.
const FIELD_ORDER: &[&str] = &[
    "name",
    "full_name",
    "email",
    "password",
    "confirm_password",
    "phone",
    "address",
    "suburb",
    "state",
    "postcode",
    "help_type",
    "urgency",
    "description",
    "preferred_date",
    "preferred_time",
    "role",
    "title",
    "message",
    "priority",
];

fn field_rank(field: &str) -> usize {
    if field == "__all__" {
        return FIELD_ORDER.len() + 1;
    }
    FIELD_ORDER
        .iter()
        .position(|f| *f == field)
        .unwrap_or(FIELD_ORDER.len())
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // field_errors() is a HashMap, so impose a stable order before
        // picking the primary message
        let mut details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
                })
            })
            .collect();

        details.sort_by(|a, b| {
            field_rank(&a.field)
                .cmp(&field_rank(&b.field))
                .then_with(|| a.field.cmp(&b.field))
                .then_with(|| a.message.cmp(&b.message))
        });

        let message = match details.first() {
            Some(first) if details.len() == 1 => first.message.clone(),
            Some(first) => format!("{} ({} validation errors)", first.message, details.len()),
            None => "Validation failed".to_string(),
        };

        ApiError::Validation(message, details)
    }
}

impl From<AccessDenied> for ApiError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Forbidden => ApiError::Forbidden("Access denied".into()),
            AccessDenied::PreconditionFailed => ApiError::PreconditionFailed(
                "Request status does not permit this operation".into(),
            ),
        }
    }
}

impl From<InvalidTransition> for ApiError {
    fn from(err: InvalidTransition) -> Self {
        ApiError::InvalidTransition(err.to_string())
    }
}
