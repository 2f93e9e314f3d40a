//! Borrows service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BorrowsServiceError {
    #[error("book not found")]
    BookNotFound,

    #[error("no borrowable copies available")]
    Unavailable,

    #[error("submitted deposit or rental fee does not match the server's figures")]
    FeeMismatch,

    #[error("borrow record not found")]
    NotFound,

    #[error("borrow record is not in a state that allows this action")]
    InvalidTransition,

    #[error("due date is out of range")]
    DueDate,

    #[error("operation requires an administrator")]
    Forbidden,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for BorrowsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::BookNotFound,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
