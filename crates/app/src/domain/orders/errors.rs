//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order has no items")]
    EmptyCart,

    #[error("a requested book is not in the catalog")]
    BookNotFound,

    #[error("not enough copies of {title} in stock")]
    InsufficientStock { title: String },

    #[error("submitted total does not match the current catalog prices")]
    TotalMismatch,

    #[error("order not found")]
    NotFound,

    #[error("order is not in a shippable state")]
    InvalidTransition,

    #[error("operation requires an administrator")]
    Forbidden,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
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
