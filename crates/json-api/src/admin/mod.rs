//! Admin Routes

mod errors;

pub(crate) mod handlers;

pub(crate) use errors::{reports_into_status_error, users_into_status_error};
