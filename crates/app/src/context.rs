//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        books::{CatalogService, PgCatalogService},
        borrows::{BorrowsService, PgBorrowsService},
        lending::{LendingService, PgLendingService},
        orders::{OrdersService, PgOrdersService},
        reports::{PgReportsService, ReportsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub orders: Arc<dyn OrdersService>,
    pub borrows: Arc<dyn BorrowsService>,
    pub lending: Arc<dyn LendingService>,
    pub users: Arc<dyn UsersService>,
    pub reports: Arc<dyn ReportsService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());

        Ok(Self {
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            borrows: Arc::new(PgBorrowsService::new(db.clone())),
            lending: Arc::new(PgLendingService::new(db.clone())),
            users: Arc::new(PgUsersService::new(db.clone())),
            reports: Arc::new(PgReportsService::new(db)),
            auth: Arc::new(PgAuthService::new(pool)),
        })
    }
}
