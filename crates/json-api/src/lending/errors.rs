//! Lending Errors

use bookflow_app::domain::lending::LendingServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: LendingServiceError) -> StatusError {
    match error {
        LendingServiceError::DuplicatePending => {
            StatusError::conflict().brief("A submission with this ISBN is already pending review")
        }
        LendingServiceError::NotFound => StatusError::not_found().brief("Submission not found"),
        LendingServiceError::AlreadyReviewed => {
            StatusError::conflict().brief("Submission has already been reviewed")
        }
        LendingServiceError::Forbidden => {
            StatusError::forbidden().brief("Operation requires an administrator")
        }
        LendingServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Title, author and ISBN are required")
        }
        LendingServiceError::InvalidData => {
            StatusError::bad_request().brief("At least one copy must be offered")
        }
        LendingServiceError::Sql(source) => {
            error!("lending storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
