//! List Users Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookflow_app::domain::users::models::User;

use crate::{admin::users_into_status_error, extensions::*, state::State};

/// Account Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccountResponse {
    /// The unique identifier of the account
    pub uuid: Uuid,

    /// The display name
    pub name: String,

    /// The email address
    pub email: String,

    /// The role, `user` or `admin`
    pub role: String,

    /// The date and time the account was created
    pub created_at: String,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        Self {
            uuid: user.uuid.into_uuid(),
            name: user.name,
            email: user.email,
            role: user.role.as_str().to_string(),
            created_at: user.created_at.to_string(),
        }
    }
}

/// List Users Handler
///
/// Returns every registered account. Administrators only.
#[endpoint(
    tags("admin"),
    summary = "List Users",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<AccountResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;

    let users = state
        .app
        .users
        .list_users(&session)
        .await
        .map_err(users_into_status_error)?;

    Ok(Json(users.into_iter().map(AccountResponse::from).collect()))
}
