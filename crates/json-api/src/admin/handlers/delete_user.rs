//! Delete User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{admin::users_into_status_error, extensions::*, state::State};

/// Delete User Handler
///
/// Deletes a non-admin account. Accounts that still own order or borrow
/// history are kept. Administrators only.
#[endpoint(
    tags("admin"),
    summary = "Delete User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Account deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::CONFLICT, description = "Admin account or history still attached"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrators only"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;

    state
        .app
        .users
        .delete_user(&session, user.into_inner())
        .await
        .map_err(users_into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use bookflow_app::domain::users::{MockUsersService, UsersServiceError};

    use crate::test_helpers::{MockServices, TEST_ADMIN_SESSION, authed_service};

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        let mocks = MockServices {
            users,
            ..MockServices::default()
        };

        authed_service(
            mocks,
            TEST_ADMIN_SESSION,
            Router::with_path("admin/user/{user}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_delete_returns_204() -> TestResult {
        let uuid = Uuid::now_v7();
        let mut users = MockUsersService::new();

        users
            .expect_delete_user()
            .once()
            .withf(move |session, user| *session == TEST_ADMIN_SESSION && *user == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/admin/user/{uuid}"))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_an_admin_returns_409() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_delete_user()
            .once()
            .return_once(|_, _| Err(UsersServiceError::CannotDeleteAdmin));

        let res = TestClient::delete(format!("http://example.com/admin/user/{}", Uuid::now_v7()))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_history_keeps_the_account_with_409() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_delete_user()
            .once()
            .return_once(|_, _| Err(UsersServiceError::InUse));

        let res = TestClient::delete(format!("http://example.com/admin/user/{}", Uuid::now_v7()))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
