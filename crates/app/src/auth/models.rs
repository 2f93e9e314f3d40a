//! Auth data models.

use crate::domain::users::models::{Role, User, UserUuid};

/// The verified identity attached to a request.
///
/// Built only by [`crate::auth::AuthService::authenticate_bearer`]; services
/// receive it explicitly and perform their own capability checks against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSession {
    pub user_uuid: UserUuid,
    pub role: Role,
}

impl AuthSession {
    #[must_use]
    pub const fn new(user_uuid: UserUuid, role: Role) -> Self {
        Self { user_uuid, role }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login / registration result with a one-time raw session token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user: User,
}

/// Session persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewSessionRecord {
    pub uuid: uuid::Uuid,
    pub user_uuid: UserUuid,
    pub token_hash: String,
}

/// Active session row joined with the owning account's role.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub user_uuid: UserUuid,
    pub role: Role,
    pub token_hash: String,
}
