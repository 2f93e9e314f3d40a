//! Borrows

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::BorrowsServiceError;
pub use service::*;
