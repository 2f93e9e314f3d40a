//! Lending Handlers

pub(crate) mod pending;
pub(crate) mod review;
pub(crate) mod submit;
pub(crate) mod user_index;
