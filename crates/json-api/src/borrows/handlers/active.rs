//! Active Borrows Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    borrows::{handlers::create::BorrowResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Active Borrows Handler
///
/// Returns every record still out (Reserved, Borrowed or Overdue), soonest
/// due first. Administrators only.
#[endpoint(
    tags("admin"),
    summary = "Active Borrows",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<BorrowResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;

    let records = state
        .app
        .borrows
        .list_active_borrows(&session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(records.into_iter().map(BorrowResponse::from).collect()))
}
