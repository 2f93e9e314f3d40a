//! Pending Submissions Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    lending::{handlers::submit::LendSubmissionResponse, into_status_error},
    state::State,
};

/// Pending Submissions Handler
///
/// Returns the review queue, oldest first. Administrators only.
#[endpoint(
    tags("admin"),
    summary = "Pending Submissions",
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
        .list_pending_submissions(&session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(
        submissions
            .into_iter()
            .map(LendSubmissionResponse::from)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use bookflow_app::{
        auth::AuthSession,
        domain::lending::{LendingServiceError, MockLendingService, models::SubmissionUuid},
    };

    use crate::test_helpers::{
        MockServices, TEST_ADMIN_SESSION, TEST_USER_SESSION, authed_service, make_submission,
    };

    use super::*;

    fn make_service(lending: MockLendingService, session: AuthSession) -> Service {
        let mocks = MockServices {
            lending,
            ..MockServices::default()
        };

        authed_service(
            mocks,
            session,
            Router::with_path("admin/lend-submissions/pending").get(handler),
        )
    }

    #[tokio::test]
    async fn test_admin_sees_the_review_queue() -> TestResult {
        let mut lending = MockLendingService::new();

        lending
            .expect_list_pending_submissions()
            .once()
            .withf(|session| *session == TEST_ADMIN_SESSION)
            .return_once(|session| {
                Ok(vec![make_submission(session.user_uuid, SubmissionUuid::new())])
            });

        let res = TestClient::get("http://example.com/admin/lend-submissions/pending")
            .send(&make_service(lending, TEST_ADMIN_SESSION))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_plain_user_gets_403() -> TestResult {
        let mut lending = MockLendingService::new();

        lending
            .expect_list_pending_submissions()
            .once()
            .return_once(|_| Err(LendingServiceError::Forbidden));

        let res = TestClient::get("http://example.com/admin/lend-submissions/pending")
            .send(&make_service(lending, TEST_USER_SESSION))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
