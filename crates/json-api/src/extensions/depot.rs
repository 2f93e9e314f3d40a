//! Depot helper extensions.

use std::any::Any;

use bookflow_app::auth::AuthSession;
use salvo::prelude::{Depot, StatusError};

const AUTH_SESSION_KEY: &str = "bookflow.auth_session";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Attach the verified session to the request. Only the auth middleware
    /// (and test fixtures) call this.
    fn insert_auth_session(&mut self, session: AuthSession);

    fn auth_session_or_401(&self) -> Result<AuthSession, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_auth_session(&mut self, session: AuthSession) {
        self.insert(AUTH_SESSION_KEY, session);
    }

    fn auth_session_or_401(&self) -> Result<AuthSession, StatusError> {
        self.get::<AuthSession>(AUTH_SESSION_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }
}
