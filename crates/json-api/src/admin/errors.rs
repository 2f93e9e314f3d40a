//! Admin Errors

use bookflow_app::domain::{reports::ReportsServiceError, users::UsersServiceError};
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn users_into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::Forbidden => {
            StatusError::forbidden().brief("Operation requires an administrator")
        }
        UsersServiceError::NotFound => StatusError::not_found().brief("User not found"),
        UsersServiceError::CannotDeleteAdmin => {
            StatusError::conflict().brief("Admin accounts cannot be deleted")
        }
        UsersServiceError::InUse => {
            StatusError::conflict().brief("User still owns order or borrow history")
        }
        UsersServiceError::Sql(source) => {
            error!("users storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn reports_into_status_error(error: ReportsServiceError) -> StatusError {
    match error {
        ReportsServiceError::Forbidden => {
            StatusError::forbidden().brief("Operation requires an administrator")
        }
        ReportsServiceError::Sql(source) => {
            error!("reports storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
