//! Shared test infrastructure.

pub(crate) mod context;
pub(crate) mod db;

pub(crate) use context::TestContext;
