//! Pending Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{handlers::create::OrderResponse, into_status_error},
    state::State,
};

/// Pending Orders Handler
///
/// Returns every order still awaiting fulfilment, oldest first.
/// Administrators only.
#[endpoint(
    tags("admin"),
    summary = "Pending Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;

    let orders = state
        .app
        .orders
        .list_pending_orders(&session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use bookflow_app::{
        auth::AuthSession,
        domain::orders::{MockOrdersService, OrdersServiceError, models::OrderUuid},
    };

    use crate::test_helpers::{
        MockServices, TEST_ADMIN_SESSION, TEST_USER_SESSION, authed_service, make_order,
    };

    use super::*;

    fn make_service(orders: MockOrdersService, session: AuthSession) -> Service {
        let mocks = MockServices {
            orders,
            ..MockServices::default()
        };

        authed_service(
            mocks,
            session,
            Router::with_path("transactions/admin/orders/pending").get(handler),
        )
    }

    #[tokio::test]
    async fn test_admin_sees_the_pending_queue() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_pending_orders()
            .once()
            .withf(|session| *session == TEST_ADMIN_SESSION)
            .return_once(|session| {
                Ok(vec![make_order(session.user_uuid, OrderUuid::new())])
            });

        let res = TestClient::get("http://example.com/transactions/admin/orders/pending")
            .send(&make_service(orders, TEST_ADMIN_SESSION))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_plain_user_gets_403() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_pending_orders()
            .once()
            .return_once(|_| Err(OrdersServiceError::Forbidden));

        let res = TestClient::get("http://example.com/transactions/admin/orders/pending")
            .send(&make_service(orders, TEST_USER_SESSION))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
