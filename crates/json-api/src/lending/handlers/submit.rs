//! Submit Lend Offer Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookflow_app::domain::lending::models::{
    Condition, LendSubmission, NewLendSubmission, SubmissionUuid,
};

use crate::{extensions::*, lending::into_status_error, state::State};

/// Submit Lend Offer Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LendSubmissionRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub edition: Option<String>,

    /// One of `New`, `Good` or `Acceptable`; defaults to `Good`
    pub condition: Option<String>,
    pub img_url: Option<String>,

    /// Defaults to a single copy
    pub copies: Option<u32>,
}

/// Lend Submission Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LendSubmissionResponse {
    /// The unique identifier of the submission
    pub uuid: Uuid,

    /// The title of the offered book
    pub title: String,

    /// The author of the offered book
    pub author: String,

    /// The ISBN of the offered book
    pub isbn: String,

    /// The edition, if declared
    pub edition: Option<String>,

    /// The declared physical condition
    pub condition: String,

    /// The cover image URL, if any
    pub img_url: Option<String>,

    /// The number of copies offered
    pub copies: u32,

    /// The review state
    pub status: String,

    /// The date and time the submission was decided, if it has been
    pub reviewed_at: Option<String>,

    /// The date and time the submission was created
    pub created_at: String,
}

impl From<LendSubmission> for LendSubmissionResponse {
    fn from(submission: LendSubmission) -> Self {
        Self {
            uuid: submission.uuid.into_uuid(),
            title: submission.title,
            author: submission.author,
            isbn: submission.isbn,
            edition: submission.edition,
            condition: submission.condition.as_str().to_string(),
            img_url: submission.img_url,
            copies: submission.copies,
            status: submission.status.as_str().to_string(),
            reviewed_at: submission.reviewed_at.as_ref().map(ToString::to_string),
            created_at: submission.created_at.to_string(),
        }
    }
}

/// Submit Lend Offer Handler
///
/// Offers a book for the lending pool on behalf of the authenticated user.
#[endpoint(
    tags("lending"),
    summary = "Offer Book",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Submission created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing fields, zero copies or unknown condition"),
        (status_code = StatusCode::CONFLICT, description = "ISBN already pending review"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LendSubmissionRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<LendSubmissionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;
    let request = json.into_inner();

    let condition = match request.condition {
        Some(value) => value
            .parse::<Condition>()
            .map_err(|_ignored| StatusError::bad_request().brief("Unknown condition"))?,
        None => Condition::default(),
    };

    let submission = state
        .app
        .lending
        .submit(
            &session,
            NewLendSubmission {
                uuid: SubmissionUuid::new(),
                title: request.title,
                author: request.author,
                isbn: request.isbn,
                edition: request.edition,
                condition,
                img_url: request.img_url,
                copies: request.copies.unwrap_or(1),
            },
        )
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(submission.into()))
}
