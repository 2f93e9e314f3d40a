//! List Books Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookflow_app::domain::books::models::Book;

use crate::{books::into_status_error, extensions::*, state::State};

/// Book Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookResponse {
    /// The unique identifier of the book
    pub uuid: Uuid,

    /// The title of the book
    pub title: String,

    /// The author of the book
    pub author: String,

    /// The price of the book in pence/cents
    pub price: u64,

    /// Copies available for purchase
    pub stock_count: u32,

    /// Copies available for loan
    pub borrowable_count: u32,

    /// The cover image URL, if any
    pub img_url: Option<String>,

    /// The date and time the book was created
    pub created_at: String,

    /// The date and time the book was last updated
    pub updated_at: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        BookResponse {
            uuid: book.uuid.into_uuid(),
            title: book.title,
            author: book.author,
            price: book.price,
            stock_count: book.stock_count,
            borrowable_count: book.borrowable_count,
            img_url: book.img_url,
            created_at: book.created_at.to_string(),
            updated_at: book.updated_at.to_string(),
        }
    }
}

/// List Books Handler
///
/// Returns every book with at least one copy in stock or available to borrow.
#[endpoint(tags("books"), summary = "List Books")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<BookResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let books = state
        .app
        .catalog
        .list_available()
        .await
        .map_err(into_status_error)?;

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}
