//! Order Handlers

pub(crate) mod create;
pub(crate) mod pending;
pub(crate) mod ship;
pub(crate) mod user_index;
