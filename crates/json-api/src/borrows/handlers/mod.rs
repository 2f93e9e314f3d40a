//! Borrow Handlers

pub(crate) mod active;
pub(crate) mod create;
pub(crate) mod status;
pub(crate) mod user_index;
