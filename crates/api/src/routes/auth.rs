//! User registration and login route handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use persistence::entities::UserEntity;
use persistence::repositories::{NewUser, UserRepository};
use shared::password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

use domain::models::user::{LoginRequest, RegisterRequest, UserResponse};

/// Create auth routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Tokens plus user returned by register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

fn user_response(user: &UserEntity) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.into(),
        is_active: user.is_active,
        is_verified: user.is_verified,
        created_at: user.created_at,
    }
}

fn issue_tokens(state: &AppState, user: &UserEntity) -> Result<(String, String), ApiError> {
    let jwt_config = UserAuth::create_jwt_config(&state.config.jwt).map_err(ApiError::Internal)?;

    let (access_token, _) = jwt_config
        .generate_access_token(user.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let (refresh_token, _) = jwt_config
        .generate_refresh_token(user.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((access_token, refresh_token))
}

/// Register a new user account.
///
/// POST /api/v1/auth/register
#[axum::debug_handler]
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let role = request
        .role
        .as_deref()
        .map(|r| r.parse())
        .transpose()
        .map_err(|e: String| ApiError::validation(e))?
        .unwrap_or_default();

    let password_hash = password::hash_password(&request.password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let user_repo = UserRepository::new(state.pool.clone());

    // A duplicate email surfaces as 23505 and maps to Conflict
    let user = user_repo
        .create(NewUser {
            email: request.email.trim().to_lowercase(),
            password_hash,
            name: request.name.trim().to_string(),
            phone: request.phone.map(|p| p.trim().to_string()),
            role,
        })
        .await?;

    let (access_token, refresh_token) = issue_tokens(&state, &user)?;

    info!(user_id = %user.id, role = ?user.role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user_response(&user),
            access_token,
            refresh_token,
        }),
    ))
}

/// Log in with email and password.
///
/// POST /api/v1/auth/login
#[axum::debug_handler]
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let user_repo = UserRepository::new(state.pool.clone());

    let user = user_repo
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is deactivated".to_string()));
    }

    let (access_token, refresh_token) = issue_tokens(&state, &user)?;

    info!(user_id = %user.id, "User logged in");

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            user: user_response(&user),
            access_token,
            refresh_token,
        }),
    ))
}
