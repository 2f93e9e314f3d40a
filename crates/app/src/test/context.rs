//! Test context for service-level integration tests.

use crate::{
    auth::{AuthService, AuthServiceError, AuthSession, NewAccount, PgAuthService},
    database::Db,
    domain::{
        books::PgCatalogService, borrows::PgBorrowsService, lending::PgLendingService,
        orders::PgOrdersService, reports::PgReportsService, users::PgUsersService,
    },
};

use super::db::TestDb;

/// Minimum bcrypt cost keeps credential-heavy suites fast.
const TEST_BCRYPT_COST: u32 = 4;

pub struct TestContext {
    pub db: TestDb,
    pub catalog: PgCatalogService,
    pub orders: PgOrdersService,
    pub borrows: PgBorrowsService,
    pub lending: PgLendingService,
    pub users: PgUsersService,
    pub reports: PgReportsService,
    pub auth: PgAuthService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            catalog: PgCatalogService::new(db.clone()),
            orders: PgOrdersService::new(db.clone()),
            borrows: PgBorrowsService::new(db.clone()),
            lending: PgLendingService::new(db.clone()),
            users: PgUsersService::new(db),
            reports: PgReportsService::new(Db::new(test_db.pool().clone())),
            auth: PgAuthService::with_cost(test_db.pool().clone(), TEST_BCRYPT_COST),
            db: test_db,
        }
    }

    /// Register a user-role account and return its verified session.
    pub async fn user_session(&self, email: &str) -> Result<AuthSession, AuthServiceError> {
        let issued = self.auth.register(account(email)).await?;

        self.auth.authenticate_bearer(&issued.token).await
    }

    /// Create an admin account and return its verified session.
    pub async fn admin_session(&self, email: &str) -> Result<AuthSession, AuthServiceError> {
        let issued = self.auth.create_admin(account(email)).await?;

        self.auth.authenticate_bearer(&issued.token).await
    }
}

fn account(email: &str) -> NewAccount {
    NewAccount {
        name: "Test Account".to_string(),
        email: email.to_string(),
        password: "test password".to_string(),
    }
}
