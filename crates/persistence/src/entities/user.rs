//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::user::UserRole;

/// Database enum for user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRoleDb {
    User,
    Volunteer,
    Admin,
}

impl From<UserRole> for UserRoleDb {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::User => UserRoleDb::User,
            UserRole::Volunteer => UserRoleDb::Volunteer,
            UserRole::Admin => UserRoleDb::Admin,
        }
    }
}

impl From<UserRoleDb> for UserRole {
    fn from(role: UserRoleDb) -> Self {
        match role {
            UserRoleDb::User => UserRole::User,
            UserRoleDb::Volunteer => UserRole::Volunteer,
            UserRoleDb::Admin => UserRole::Admin,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: UserRoleDb,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
