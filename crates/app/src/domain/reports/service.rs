//! Reports service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::AuthSession,
    database::Db,
    domain::reports::{
        errors::ReportsServiceError, models::AdminSummary, repository::PgReportsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgReportsService {
    db: Db,
    repository: PgReportsRepository,
}

impl PgReportsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReportsRepository::new(),
        }
    }
}

#[async_trait]
impl ReportsService for PgReportsService {
    async fn admin_summary(
        &self,
        session: &AuthSession,
    ) -> Result<AdminSummary, ReportsServiceError> {
        if !session.is_admin() {
            return Err(ReportsServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let summary = self.repository.summary(&mut tx).await?;

        tx.commit().await?;

        Ok(summary)
    }
}

#[automock]
#[async_trait]
pub trait ReportsService: Send + Sync {
    /// Current dashboard counts. Administrators only.
    async fn admin_summary(
        &self,
        session: &AuthSession,
    ) -> Result<AdminSummary, ReportsServiceError>;
}
