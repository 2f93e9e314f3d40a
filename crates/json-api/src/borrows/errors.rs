//! Borrow Errors

use bookflow_app::domain::borrows::BorrowsServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: BorrowsServiceError) -> StatusError {
    match error {
        BorrowsServiceError::BookNotFound => StatusError::not_found().brief("Book not found"),
        BorrowsServiceError::Unavailable => {
            StatusError::conflict().brief("No borrowable copies available")
        }
        BorrowsServiceError::FeeMismatch => StatusError::bad_request()
            .brief("Submitted deposit or rental fee does not match the server's figures"),
        BorrowsServiceError::NotFound => {
            StatusError::not_found().brief("Borrow record not found")
        }
        BorrowsServiceError::InvalidTransition => {
            StatusError::conflict().brief("Borrow record does not allow this action")
        }
        BorrowsServiceError::DueDate => {
            error!("computed due date out of range");

            StatusError::internal_server_error()
        }
        BorrowsServiceError::Forbidden => {
            StatusError::forbidden().brief("Operation requires an administrator")
        }
        BorrowsServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Pickup name, address, city and pincode are required")
        }
        BorrowsServiceError::Sql(source) => {
            error!("borrow storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
