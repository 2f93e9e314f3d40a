//! Borrows service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    auth::AuthSession,
    database::Db,
    domain::borrows::{
        errors::BorrowsServiceError,
        models::{BORROW_PERIOD, BorrowAction, BorrowRecord, BorrowUuid, NewBorrow, RENTAL_FEE},
        repository::{NewBorrowRecord, PgBorrowsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgBorrowsService {
    db: Db,
    repository: PgBorrowsRepository,
}

impl PgBorrowsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgBorrowsRepository::new(),
        }
    }

    async fn load_borrow(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: BorrowUuid,
    ) -> Result<BorrowRecord, BorrowsServiceError> {
        self.repository
            .get_borrow(tx, uuid)
            .await?
            .ok_or(BorrowsServiceError::NotFound)
    }
}

#[async_trait]
impl BorrowsService for PgBorrowsService {
    #[tracing::instrument(
        name = "borrows.service.place_borrow",
        skip(self, session, borrow),
        fields(borrow_uuid = %borrow.uuid, book_uuid = %borrow.book_uuid),
        err
    )]
    async fn place_borrow(
        &self,
        session: &AuthSession,
        borrow: NewBorrow,
    ) -> Result<BorrowRecord, BorrowsServiceError> {
        if borrow.pickup.name.trim().is_empty()
            || borrow.pickup.address.trim().is_empty()
            || borrow.pickup.city.trim().is_empty()
            || borrow.pickup.pincode.trim().is_empty()
        {
            return Err(BorrowsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let book = self
            .repository
            .get_book_for_loan(&mut tx, borrow.book_uuid)
            .await?
            .ok_or(BorrowsServiceError::BookNotFound)?;

        // The server's figures are authoritative; the client only echoes what
        // it displayed.
        let deposit_amount = book.price / 2;

        if borrow.client_deposit != deposit_amount || borrow.client_rental_fee != RENTAL_FEE {
            return Err(BorrowsServiceError::FeeMismatch);
        }

        let taken = self
            .repository
            .decrement_borrowable(&mut tx, borrow.book_uuid)
            .await?;

        if taken == 0 {
            return Err(BorrowsServiceError::Unavailable);
        }

        let borrow_date = Timestamp::now();
        let due_date = borrow_date
            .checked_add(BORROW_PERIOD)
            .map_err(|_| BorrowsServiceError::DueDate)?;

        self.repository
            .insert_borrow(
                &mut tx,
                &NewBorrowRecord {
                    uuid: borrow.uuid,
                    user_uuid: session.user_uuid,
                    book_uuid: borrow.book_uuid,
                    pickup: borrow.pickup,
                    borrow_date,
                    due_date,
                    deposit_amount,
                    rental_fee: RENTAL_FEE,
                },
            )
            .await?;

        let placed = self.load_borrow(&mut tx, borrow.uuid).await?;

        tx.commit().await?;

        Ok(placed)
    }

    async fn list_user_borrows(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<BorrowRecord>, BorrowsServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self
            .repository
            .list_user_borrows(&mut tx, session.user_uuid)
            .await?;

        tx.commit().await?;

        Ok(records)
    }

    async fn list_active_borrows(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<BorrowRecord>, BorrowsServiceError> {
        if !session.is_admin() {
            return Err(BorrowsServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let records = self.repository.list_active_borrows(&mut tx).await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "borrows.service.update_status",
        skip(self, session),
        fields(borrow_uuid = %borrow, action = ?action),
        err
    )]
    async fn update_status(
        &self,
        session: &AuthSession,
        borrow: BorrowUuid,
        action: BorrowAction,
    ) -> Result<BorrowRecord, BorrowsServiceError> {
        if !session.is_admin() {
            return Err(BorrowsServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let updated = match action {
            BorrowAction::Pickup => self.repository.mark_picked_up(&mut tx, borrow).await?,
            BorrowAction::Return => self.repository.mark_returned(&mut tx, borrow).await?,
            BorrowAction::Lost => self.repository.mark_lost(&mut tx, borrow).await?,
        };

        if updated == 0 {
            // Distinguish a missing record from one in the wrong state.
            return match self.repository.get_borrow(&mut tx, borrow).await? {
                Some(_) => Err(BorrowsServiceError::InvalidTransition),
                None => Err(BorrowsServiceError::NotFound),
            };
        }

        let record = self.load_borrow(&mut tx, borrow).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(name = "borrows.service.flag_overdue", skip(self), err)]
    async fn flag_overdue(&self, now: Timestamp) -> Result<u64, BorrowsServiceError> {
        let mut tx = self.db.begin().await?;

        let flagged = self.repository.flag_overdue(&mut tx, now).await?;

        tx.commit().await?;

        if flagged > 0 {
            tracing::info!(flagged, "loans moved to overdue");
        }

        Ok(flagged)
    }
}

#[automock]
#[async_trait]
pub trait BorrowsService: Send + Sync {
    /// Reserve one borrowable copy for the session's user.
    ///
    /// The copy is taken, the fees verified, and the record created inside one
    /// transaction; nothing is persisted when any step fails.
    async fn place_borrow(
        &self,
        session: &AuthSession,
        borrow: NewBorrow,
    ) -> Result<BorrowRecord, BorrowsServiceError>;

    /// The session's own borrow records, newest first.
    async fn list_user_borrows(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<BorrowRecord>, BorrowsServiceError>;

    /// Every record still out (Reserved, Borrowed or Overdue), soonest due
    /// first. Administrators only.
    async fn list_active_borrows(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<BorrowRecord>, BorrowsServiceError>;

    /// Apply an administrative lifecycle action to a borrow record.
    async fn update_status(
        &self,
        session: &AuthSession,
        borrow: BorrowUuid,
        action: BorrowAction,
    ) -> Result<BorrowRecord, BorrowsServiceError>;

    /// Flip every Borrowed record whose due date precedes `now` to Overdue.
    /// Returns the number of records flagged.
    async fn flag_overdue(&self, now: Timestamp) -> Result<u64, BorrowsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            books::models::{Book, BookUuid, NewBook},
            books::service::CatalogService,
            borrows::models::BorrowStatus,
            orders::models::ShippingAddress,
        },
        test::TestContext,
    };

    use super::*;

    fn pickup() -> ShippingAddress {
        ShippingAddress {
            name: "Pat Reader".to_string(),
            address: "1 Library Lane".to_string(),
            city: "Booktown".to_string(),
            pincode: "560001".to_string(),
        }
    }

    fn borrow_for(book: &Book) -> NewBorrow {
        NewBorrow {
            uuid: BorrowUuid::new(),
            book_uuid: book.uuid,
            pickup: pickup(),
            client_deposit: book.price / 2,
            client_rental_fee: RENTAL_FEE,
        }
    }

    async fn seed_book(ctx: &TestContext, title: &str, price: u64, copies: u32) -> TestResult<Book> {
        Ok(ctx
            .catalog
            .create_book(NewBook {
                uuid: BookUuid::new(),
                title: title.to_string(),
                author: "Someone".to_string(),
                price,
                stock_count: 0,
                borrowable_count: copies,
                img_url: None,
            })
            .await?)
    }

    #[tokio::test]
    async fn borrow_reserves_a_copy_and_computes_fees() -> TestResult {
        let ctx = TestContext::new().await;
        let session = ctx.user_session("reader@example.com").await?;
        let book = seed_book(&ctx, "Dune", 50_00, 2).await?;

        let record = ctx.borrows.place_borrow(&session, borrow_for(&book)).await?;

        assert_eq!(record.status, BorrowStatus::Reserved);
        assert_eq!(record.deposit_amount, 25_00);
        assert_eq!(record.rental_fee, RENTAL_FEE);
        assert_eq!(record.due_date.duration_since(record.borrow_date), BORROW_PERIOD);
        assert!(record.return_date.is_none());
        assert!(!record.is_deposit_refunded);
        assert!(record.is_returned_in_good_condition.is_none());

        assert_eq!(ctx.catalog.get_book(book.uuid).await?.borrowable_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn mismatched_fees_are_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let session = ctx.user_session("reader@example.com").await?;
        let book = seed_book(&ctx, "Dune", 50_00, 2).await?;

        let mut borrow = borrow_for(&book);
        borrow.client_deposit = 1;

        let result = ctx.borrows.place_borrow(&session, borrow).await;

        assert!(
            matches!(result, Err(BorrowsServiceError::FeeMismatch)),
            "expected FeeMismatch, got {result:?}"
        );
        assert_eq!(ctx.catalog.get_book(book.uuid).await?.borrowable_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_title_is_unavailable() -> TestResult {
        let ctx = TestContext::new().await;
        let session = ctx.user_session("reader@example.com").await?;
        let book = seed_book(&ctx, "Dune", 50_00, 0).await?;

        let result = ctx.borrows.place_borrow(&session, borrow_for(&book)).await;

        assert!(
            matches!(result, Err(BorrowsServiceError::Unavailable)),
            "expected Unavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn simultaneous_borrows_take_at_most_the_last_copy() -> TestResult {
        let ctx = TestContext::new().await;
        let session = ctx.user_session("reader@example.com").await?;
        let book = seed_book(&ctx, "Dune", 50_00, 1).await?;

        let (first, second) = tokio::join!(
            ctx.borrows.place_borrow(&session, borrow_for(&book)),
            ctx.borrows.place_borrow(&session, borrow_for(&book)),
        );

        let outcomes = [first, second];

        assert_eq!(
            outcomes.iter().filter(|r| r.is_ok()).count(),
            1,
            "exactly one request may take the copy, got {outcomes:?}"
        );
        assert!(
            outcomes
                .iter()
                .any(|r| matches!(r, Err(BorrowsServiceError::Unavailable))),
            "the losing request must see the title as unavailable, got {outcomes:?}"
        );
        assert_eq!(ctx.catalog.get_book(book.uuid).await?.borrowable_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_book_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let session = ctx.user_session("reader@example.com").await?;

        let result = ctx
            .borrows
            .place_borrow(
                &session,
                NewBorrow {
                    uuid: BorrowUuid::new(),
                    book_uuid: BookUuid::new(),
                    pickup: pickup(),
                    client_deposit: 0,
                    client_rental_fee: RENTAL_FEE,
                },
            )
            .await;

        assert!(
            matches!(result, Err(BorrowsServiceError::BookNotFound)),
            "expected BookNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn pickup_then_return_walks_the_lifecycle() -> TestResult {
        let ctx = TestContext::new().await;
        let reader = ctx.user_session("reader@example.com").await?;
        let admin = ctx.admin_session("admin@example.com").await?;
        let book = seed_book(&ctx, "Dune", 50_00, 1).await?;

        let placed = ctx.borrows.place_borrow(&reader, borrow_for(&book)).await?;

        let picked = ctx
            .borrows
            .update_status(&admin, placed.uuid, BorrowAction::Pickup)
            .await?;
        assert_eq!(picked.status, BorrowStatus::Borrowed);

        let returned = ctx
            .borrows
            .update_status(&admin, placed.uuid, BorrowAction::Return)
            .await?;
        assert_eq!(returned.status, BorrowStatus::Returned);
        assert!(returned.return_date.is_some());
        assert!(returned.is_deposit_refunded);
        assert_eq!(returned.is_returned_in_good_condition, Some(true));

        let again = ctx
            .borrows
            .update_status(&admin, placed.uuid, BorrowAction::Return)
            .await;
        assert!(
            matches!(again, Err(BorrowsServiceError::InvalidTransition)),
            "expected InvalidTransition, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn return_requires_a_pickup_first() -> TestResult {
        let ctx = TestContext::new().await;
        let reader = ctx.user_session("reader@example.com").await?;
        let admin = ctx.admin_session("admin@example.com").await?;
        let book = seed_book(&ctx, "Dune", 50_00, 1).await?;

        let placed = ctx.borrows.place_borrow(&reader, borrow_for(&book)).await?;

        let result = ctx
            .borrows
            .update_status(&admin, placed.uuid, BorrowAction::Return)
            .await;

        assert!(
            matches!(result, Err(BorrowsServiceError::InvalidTransition)),
            "expected InvalidTransition, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn borrowed_copy_can_be_written_off_as_lost() -> TestResult {
        let ctx = TestContext::new().await;
        let reader = ctx.user_session("reader@example.com").await?;
        let admin = ctx.admin_session("admin@example.com").await?;
        let book = seed_book(&ctx, "Dune", 50_00, 2).await?;

        let kept = ctx.borrows.place_borrow(&reader, borrow_for(&book)).await?;
        let reserved_only = ctx.borrows.place_borrow(&reader, borrow_for(&book)).await?;

        ctx.borrows
            .update_status(&admin, kept.uuid, BorrowAction::Pickup)
            .await?;

        let lost = ctx
            .borrows
            .update_status(&admin, kept.uuid, BorrowAction::Lost)
            .await?;
        assert_eq!(lost.status, BorrowStatus::Lost);

        // A copy that was never picked up cannot be lost.
        let still_reserved = ctx
            .borrows
            .update_status(&admin, reserved_only.uuid, BorrowAction::Lost)
            .await;
        assert!(
            matches!(still_reserved, Err(BorrowsServiceError::InvalidTransition)),
            "expected InvalidTransition, got {still_reserved:?}"
        );

        let missing = ctx
            .borrows
            .update_status(&admin, BorrowUuid::new(), BorrowAction::Pickup)
            .await;
        assert!(
            matches!(missing, Err(BorrowsServiceError::NotFound)),
            "expected NotFound, got {missing:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn overdue_sweep_flags_only_past_due_borrowed_records() -> TestResult {
        let ctx = TestContext::new().await;
        let reader = ctx.user_session("reader@example.com").await?;
        let admin = ctx.admin_session("admin@example.com").await?;
        let book = seed_book(&ctx, "Dune", 50_00, 2).await?;

        let out = ctx.borrows.place_borrow(&reader, borrow_for(&book)).await?;
        let reserved = ctx.borrows.place_borrow(&reader, borrow_for(&book)).await?;

        ctx.borrows
            .update_status(&admin, out.uuid, BorrowAction::Pickup)
            .await?;

        // Nothing is due yet.
        assert_eq!(ctx.borrows.flag_overdue(Timestamp::now()).await?, 0);

        // Fifteen days on, the borrowed copy is overdue but the reservation
        // is untouched.
        let later = Timestamp::now()
            .checked_add(BORROW_PERIOD)
            .and_then(|t| t.checked_add(jiff::SignedDuration::from_hours(24)))?;

        assert_eq!(ctx.borrows.flag_overdue(later).await?, 1);

        let records = ctx.borrows.list_user_borrows(&reader).await?;
        let status_of = |uuid| {
            records
                .iter()
                .find(|r| r.uuid == uuid)
                .map(|r| r.status)
        };

        assert_eq!(status_of(out.uuid), Some(BorrowStatus::Overdue));
        assert_eq!(status_of(reserved.uuid), Some(BorrowStatus::Reserved));

        // Overdue copies cannot be returned, only written off.
        let written_off = ctx
            .borrows
            .update_status(&admin, out.uuid, BorrowAction::Lost)
            .await?;
        assert_eq!(written_off.status, BorrowStatus::Lost);

        Ok(())
    }

    #[tokio::test]
    async fn active_listing_is_admin_only_and_sorted_by_due_date() -> TestResult {
        let ctx = TestContext::new().await;
        let reader = ctx.user_session("reader@example.com").await?;
        let admin = ctx.admin_session("admin@example.com").await?;
        let book = seed_book(&ctx, "Dune", 50_00, 3).await?;

        let first = ctx.borrows.place_borrow(&reader, borrow_for(&book)).await?;
        let second = ctx.borrows.place_borrow(&reader, borrow_for(&book)).await?;

        let denied = ctx.borrows.list_active_borrows(&reader).await;
        assert!(
            matches!(denied, Err(BorrowsServiceError::Forbidden)),
            "expected Forbidden, got {denied:?}"
        );

        let active = ctx.borrows.list_active_borrows(&admin).await?;
        let uuids: Vec<BorrowUuid> = active.iter().map(|r| r.uuid).collect();

        assert_eq!(uuids, vec![first.uuid, second.uuid]);
        assert_eq!(active[0].borrower_email, "reader@example.com");
        assert_eq!(active[0].title, "Dune");

        Ok(())
    }

    #[tokio::test]
    async fn status_actions_require_an_administrator() -> TestResult {
        let ctx = TestContext::new().await;
        let reader = ctx.user_session("reader@example.com").await?;
        let book = seed_book(&ctx, "Dune", 50_00, 1).await?;

        let placed = ctx.borrows.place_borrow(&reader, borrow_for(&book)).await?;

        let result = ctx
            .borrows
            .update_status(&reader, placed.uuid, BorrowAction::Pickup)
            .await;

        assert!(
            matches!(result, Err(BorrowsServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }
}
