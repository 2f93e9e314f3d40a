//! Reports Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{reports::models::AdminSummary, row::try_get_amount};

const SUMMARY_SQL: &str = include_str!("sql/summary.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReportsRepository;

impl PgReportsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn summary(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<AdminSummary, sqlx::Error> {
        query_as::<Postgres, AdminSummary>(SUMMARY_SQL)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AdminSummary {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            total_users: try_get_amount(row, "total_users")?,
            admin_users: try_get_amount(row, "admin_users")?,
            total_books: try_get_amount(row, "total_books")?,
            pending_orders: try_get_amount(row, "pending_orders")?,
            active_borrows: try_get_amount(row, "active_borrows")?,
            pending_submissions: try_get_amount(row, "pending_submissions")?,
        })
    }
}
