//! Lending Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    books::repository::to_db_count,
    lending::models::{
        Condition, LendSubmission, NewLendSubmission, SubmissionStatus, SubmissionUuid,
    },
    row::{try_get_count, try_get_parsed},
    users::models::UserUuid,
};

const INSERT_SUBMISSION_SQL: &str = include_str!("sql/insert_submission.sql");
const GET_SUBMISSION_SQL: &str = include_str!("sql/get_submission.sql");
const LIST_USER_SUBMISSIONS_SQL: &str = include_str!("sql/list_user_submissions.sql");
const LIST_PENDING_SUBMISSIONS_SQL: &str = include_str!("sql/list_pending_submissions.sql");
const MARK_REVIEWED_SQL: &str = include_str!("sql/mark_reviewed.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLendingRepository;

impl PgLendingRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_submission(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lender: UserUuid,
        submission: &NewLendSubmission,
    ) -> Result<LendSubmission, sqlx::Error> {
        query_as::<Postgres, LendSubmission>(INSERT_SUBMISSION_SQL)
            .bind(submission.uuid.into_uuid())
            .bind(lender.into_uuid())
            .bind(&submission.title)
            .bind(&submission.author)
            .bind(&submission.isbn)
            .bind(submission.edition.as_deref())
            .bind(submission.condition.as_str())
            .bind(submission.img_url.as_deref())
            .bind(to_db_count(submission.copies)?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch a submission and take a row lock on it so concurrent reviews
    /// serialize.
    pub(crate) async fn get_submission(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        submission: SubmissionUuid,
    ) -> Result<Option<LendSubmission>, sqlx::Error> {
        query_as::<Postgres, LendSubmission>(GET_SUBMISSION_SQL)
            .bind(submission.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_submissions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lender: UserUuid,
    ) -> Result<Vec<LendSubmission>, sqlx::Error> {
        query_as::<Postgres, LendSubmission>(LIST_USER_SUBMISSIONS_SQL)
            .bind(lender.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_pending_submissions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<LendSubmission>, sqlx::Error> {
        query_as::<Postgres, LendSubmission>(LIST_PENDING_SUBMISSIONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Stamp the verdict on a still-pending submission. Returns the updated
    /// row, or `None` when the record was not pending (or does not exist).
    pub(crate) async fn mark_reviewed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        submission: SubmissionUuid,
        verdict: SubmissionStatus,
    ) -> Result<Option<LendSubmission>, sqlx::Error> {
        query_as::<Postgres, LendSubmission>(MARK_REVIEWED_SQL)
            .bind(submission.into_uuid())
            .bind(verdict.as_str())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for LendSubmission {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: SubmissionUuid::from_uuid(row.try_get("uuid")?),
            lender_uuid: UserUuid::from_uuid(row.try_get("lender_uuid")?),
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            isbn: row.try_get("isbn")?,
            edition: row.try_get("edition")?,
            condition: try_get_parsed::<Condition, _>(row, "condition")?,
            img_url: row.try_get("img_url")?,
            copies: try_get_count(row, "copies")?,
            status: try_get_parsed::<SubmissionStatus, _>(row, "status")?,
            reviewed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("reviewed_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
