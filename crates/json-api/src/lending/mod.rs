//! Lending Routes

mod errors;

pub(crate) mod handlers;

pub(crate) use errors::into_status_error;
