//! Lending service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::AuthSession,
    database::Db,
    domain::{
        books::{
            models::{BookUuid, NewBook},
            repository::PgBooksRepository,
        },
        lending::{
            errors::LendingServiceError,
            models::{
                LendSubmission, NewLendSubmission, ReviewAction, SubmissionStatus, SubmissionUuid,
            },
            repository::PgLendingRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgLendingService {
    db: Db,
    repository: PgLendingRepository,
    books: PgBooksRepository,
}

impl PgLendingService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgLendingRepository::new(),
            books: PgBooksRepository::new(),
        }
    }
}

#[async_trait]
impl LendingService for PgLendingService {
    async fn submit(
        &self,
        session: &AuthSession,
        submission: NewLendSubmission,
    ) -> Result<LendSubmission, LendingServiceError> {
        if submission.title.trim().is_empty()
            || submission.author.trim().is_empty()
            || submission.isbn.trim().is_empty()
        {
            return Err(LendingServiceError::MissingRequiredData);
        }

        if submission.copies == 0 {
            return Err(LendingServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        // The partial unique index on pending ISBNs turns a racing duplicate
        // into a unique violation here.
        let created = self
            .repository
            .insert_submission(&mut tx, session.user_uuid, &submission)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_user_submissions(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<LendSubmission>, LendingServiceError> {
        let mut tx = self.db.begin().await?;

        let submissions = self
            .repository
            .list_user_submissions(&mut tx, session.user_uuid)
            .await?;

        tx.commit().await?;

        Ok(submissions)
    }

    async fn list_pending_submissions(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<LendSubmission>, LendingServiceError> {
        if !session.is_admin() {
            return Err(LendingServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let submissions = self.repository.list_pending_submissions(&mut tx).await?;

        tx.commit().await?;

        Ok(submissions)
    }

    #[tracing::instrument(
        name = "lending.service.review",
        skip(self, session),
        fields(submission_uuid = %submission, action = ?action),
        err
    )]
    async fn review(
        &self,
        session: &AuthSession,
        submission: SubmissionUuid,
        action: ReviewAction,
    ) -> Result<LendSubmission, LendingServiceError> {
        if !session.is_admin() {
            return Err(LendingServiceError::Forbidden);
        }

        let verdict = match action {
            ReviewAction::Approve => SubmissionStatus::Approved,
            ReviewAction::Reject => SubmissionStatus::Rejected,
        };

        let mut tx = self.db.begin().await?;

        let Some(reviewed) = self
            .repository
            .mark_reviewed(&mut tx, submission, verdict)
            .await?
        else {
            // Distinguish a missing submission from one already decided.
            return match self.repository.get_submission(&mut tx, submission).await? {
                Some(_) => Err(LendingServiceError::AlreadyReviewed),
                None => Err(LendingServiceError::NotFound),
            };
        };

        // Approval feeds the copies back into the catalog in the same
        // transaction: an existing title gains borrowable copies, a new one
        // enters as lend-only.
        if verdict == SubmissionStatus::Approved {
            let existing = self
                .books
                .find_by_title_author(&mut tx, &reviewed.title, &reviewed.author)
                .await?;

            match existing {
                Some(book) => {
                    self.books
                        .add_borrowable_copies(&mut tx, book.uuid, reviewed.copies)
                        .await?;
                }
                None => {
                    self.books
                        .create_book(
                            &mut tx,
                            &NewBook {
                                uuid: BookUuid::new(),
                                title: reviewed.title.clone(),
                                author: reviewed.author.clone(),
                                price: 0,
                                stock_count: 0,
                                borrowable_count: reviewed.copies,
                                img_url: reviewed.img_url.clone(),
                            },
                        )
                        .await?;
                }
            }
        }

        tx.commit().await?;

        Ok(reviewed)
    }
}

#[automock]
#[async_trait]
pub trait LendingService: Send + Sync {
    /// Offer a book for the lending pool on behalf of the session's user.
    ///
    /// An ISBN may only be under review once at a time; resubmitting a
    /// rejected ISBN is allowed.
    async fn submit(
        &self,
        session: &AuthSession,
        submission: NewLendSubmission,
    ) -> Result<LendSubmission, LendingServiceError>;

    /// The session's own submissions, newest first.
    async fn list_user_submissions(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<LendSubmission>, LendingServiceError>;

    /// The review queue, oldest first. Administrators only.
    async fn list_pending_submissions(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<LendSubmission>, LendingServiceError>;

    /// Decide a pending submission. Approval writes the copies through to the
    /// catalog atomically. Administrators only.
    async fn review(
        &self,
        session: &AuthSession,
        submission: SubmissionUuid,
        action: ReviewAction,
    ) -> Result<LendSubmission, LendingServiceError>;
}
