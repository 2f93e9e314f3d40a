//! Borrow Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookflow_app::domain::borrows::models::BorrowAction;

use crate::{
    borrows::{handlers::create::BorrowResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Borrow Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BorrowStatusRequest {
    /// One of `pickup`, `return` or `lost`
    pub action: String,
}

/// Borrow Status Handler
///
/// Applies an administrative lifecycle action to a borrow record.
/// Administrators only.
#[endpoint(
    tags("admin"),
    summary = "Update Borrow Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Record updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown action"),
        (status_code = StatusCode::NOT_FOUND, description = "Borrow record not found"),
        (status_code = StatusCode::CONFLICT, description = "Record does not allow this action"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrators only"),
    ),
)]
pub(crate) async fn handler(
    borrow: PathParam<Uuid>,
    json: JsonBody<BorrowStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<BorrowResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;

    let action: BorrowAction = json
        .into_inner()
        .action
        .parse()
        .map_err(|_ignored| StatusError::bad_request().brief("Unknown borrow action"))?;

    let record = state
        .app
        .borrows
        .update_status(&session, borrow.into_inner().into(), action)
        .await
        .map_err(into_status_error)?;

    Ok(Json(record.into()))
}
