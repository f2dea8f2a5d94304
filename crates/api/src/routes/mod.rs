//! HTTP route handlers.

pub mod announcements;
pub mod auth;
pub mod health;
pub mod help_requests;
pub mod notifications;

use persistence::entities::UserEntity;
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

use domain::services::authorization::Principal;

/// Loads the authenticated user's account record.
///
/// A valid token whose account no longer exists (or was deactivated)
/// is treated as unauthenticated.
pub(crate) async fn load_user(state: &AppState, auth: &UserAuth) -> Result<UserEntity, ApiError> {
    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_id(auth.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::Unauthorized("Account not found or inactive".to_string()))?;
    Ok(user)
}

/// Builds the acting principal for an authorization decision.
///
/// Authenticated callers resolve to their account identity; everyone
/// else is anonymous, optionally carrying a confirmation email as an
/// ownership claim.
pub(crate) async fn resolve_principal(
    state: &AppState,
    auth: Option<&UserAuth>,
    confirmation_email: Option<&str>,
) -> Result<Principal, ApiError> {
    match auth {
        Some(auth) => {
            let user = load_user(state, auth).await?;
            Ok(Principal::User {
                id: user.id,
                email: user.email,
                role: user.role.into(),
            })
        }
        None => Ok(match confirmation_email {
            Some(email) => Principal::anonymous_with_email(email.trim().to_lowercase()),
            None => Principal::anonymous(),
        }),
    }
}
