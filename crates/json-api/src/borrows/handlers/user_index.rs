//! User Borrows Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    borrows::{handlers::create::BorrowResponse, into_status_error},
    extensions::*,
    state::State,
};

/// User Borrows Handler
///
/// Returns the authenticated user's own borrow records, newest first.
#[endpoint(
    tags("borrows"),
    summary = "Borrow History",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<BorrowResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;

    let records = state
        .app
        .borrows
        .list_user_borrows(&session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(records.into_iter().map(BorrowResponse::from).collect()))
}
