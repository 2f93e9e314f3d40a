//! Search Books Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    books::{handlers::index::BookResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Search Books Handler
///
/// Returns the books whose title or author matches the search term. A blank
/// term behaves like the full listing.
#[endpoint(tags("books"), summary = "Search Books")]
pub(crate) async fn handler(
    q: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<BookResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let term = q.into_inner().unwrap_or_default();

    let books = state
        .app
        .catalog
        .search(&term)
        .await
        .map_err(into_status_error)?;

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}
