//! Reports service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportsServiceError {
    #[error("operation requires an administrator")]
    Forbidden,

    #[error("storage error")]
    Sql(#[from] Error),
}
