//! Admin Handlers

pub(crate) mod delete_user;
pub(crate) mod summary;
pub(crate) mod users;
