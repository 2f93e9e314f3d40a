//! Ship Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{handlers::create::OrderResponse, into_status_error},
    state::State,
};

/// Ship Order Handler
///
/// Moves a processing order to shipped. Administrators only.
#[endpoint(
    tags("admin"),
    summary = "Ship Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order shipped"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order is not in a shippable state"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrators only"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;

    let order = state
        .app
        .orders
        .mark_shipped(&session, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
