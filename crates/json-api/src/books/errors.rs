//! Catalog Errors

use bookflow_app::domain::books::CatalogServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::AlreadyExists => {
            StatusError::conflict().brief("A book with this title and author already exists")
        }
        CatalogServiceError::NotFound => StatusError::not_found().brief("Book not found"),
        CatalogServiceError::InvalidReference => {
            StatusError::not_found().brief("Related resource not found")
        }
        CatalogServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Title and author are required")
        }
        CatalogServiceError::InvalidData => StatusError::bad_request().brief("Invalid book data"),
        CatalogServiceError::Sql(source) => {
            error!("catalog storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
