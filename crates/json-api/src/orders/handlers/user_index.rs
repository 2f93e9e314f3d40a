//! User Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{handlers::create::OrderResponse, into_status_error},
    state::State,
};

/// User Orders Handler
///
/// Returns the authenticated user's own orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "Order History",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;

    let orders = state
        .app
        .orders
        .list_user_orders(&session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
