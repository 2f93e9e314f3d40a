//! Review Submission Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use bookflow_app::domain::lending::models::ReviewAction;

use crate::{
    extensions::*,
    lending::{handlers::submit::LendSubmissionResponse, into_status_error},
    state::State,
};

/// Review Submission Handler
///
/// Decides a pending submission. Approval writes the offered copies through
/// to the catalog atomically. Administrators only.
#[endpoint(
    tags("admin"),
    summary = "Review Submission",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Submission decided"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown review action"),
        (status_code = StatusCode::NOT_FOUND, description = "Submission not found"),
        (status_code = StatusCode::CONFLICT, description = "Submission already reviewed"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrators only"),
    ),
)]
pub(crate) async fn handler(
    submission: PathParam<Uuid>,
    action: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<LendSubmissionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;

    let action: ReviewAction = action
        .into_inner()
        .parse()
        .map_err(|_ignored| StatusError::bad_request().brief("Unknown review action"))?;

    let submission = state
        .app
        .lending
        .review(&session, submission.into_inner().into(), action)
        .await
        .map_err(into_status_error)?;

    Ok(Json(submission.into()))
}
