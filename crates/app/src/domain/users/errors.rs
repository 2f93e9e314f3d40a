//! Users service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("admin capability required")]
    Forbidden,

    #[error("user not found")]
    NotFound,

    #[error("admin accounts cannot be deleted")]
    CannotDeleteAdmin,

    #[error("user still owns order or borrow history")]
    InUse,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InUse,
            _ => Self::Sql(error),
        }
    }
}
