//! User Submissions Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    lending::{handlers::submit::LendSubmissionResponse, into_status_error},
    state::State,
};

/// User Submissions Handler
///
/// Returns the authenticated user's own lend submissions, newest first.
#[endpoint(
    tags("lending"),
    summary = "Submission History",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<LendSubmissionResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;

    let submissions = state
        .app
        .lending
        .list_user_submissions(&session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(
        submissions
            .into_iter()
            .map(LendSubmissionResponse::from)
            .collect(),
    ))
}
