//! Borrows Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    books::{
        models::{Book, BookUuid},
        repository::to_db_amount,
    },
    borrows::models::{BorrowRecord, BorrowStatus, BorrowUuid},
    orders::models::ShippingAddress,
    row::{try_get_amount, try_get_parsed},
    users::models::UserUuid,
};

const GET_BOOK_FOR_LOAN_SQL: &str = include_str!("sql/get_book_for_loan.sql");
const DECREMENT_BORROWABLE_SQL: &str = include_str!("sql/decrement_borrowable.sql");
const INSERT_BORROW_SQL: &str = include_str!("sql/insert_borrow.sql");
const GET_BORROW_SQL: &str = include_str!("sql/get_borrow.sql");
const LIST_USER_BORROWS_SQL: &str = include_str!("sql/list_user_borrows.sql");
const LIST_ACTIVE_BORROWS_SQL: &str = include_str!("sql/list_active_borrows.sql");
const MARK_PICKED_UP_SQL: &str = include_str!("sql/mark_picked_up.sql");
const MARK_RETURNED_SQL: &str = include_str!("sql/mark_returned.sql");
const MARK_LOST_SQL: &str = include_str!("sql/mark_lost.sql");
const FLAG_OVERDUE_SQL: &str = include_str!("sql/flag_overdue.sql");

#[derive(Debug, Clone)]
pub(crate) struct NewBorrowRecord {
    pub uuid: BorrowUuid,
    pub user_uuid: UserUuid,
    pub book_uuid: BookUuid,
    pub pickup: ShippingAddress,
    pub borrow_date: Timestamp,
    pub due_date: Timestamp,
    pub deposit_amount: u64,
    pub rental_fee: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBorrowsRepository;

impl PgBorrowsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Fetch a book and take a row lock on it so concurrent loans of the same
    /// title serialize.
    pub(crate) async fn get_book_for_loan(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<Option<Book>, sqlx::Error> {
        query_as::<Postgres, Book>(GET_BOOK_FOR_LOAN_SQL)
            .bind(book.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Take one borrowable copy if any remain. Returns the number of rows
    /// updated; zero means none were available.
    pub(crate) async fn decrement_borrowable(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DECREMENT_BORROWABLE_SQL)
            .bind(book.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn insert_borrow(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: &NewBorrowRecord,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_BORROW_SQL)
            .bind(record.uuid.into_uuid())
            .bind(record.user_uuid.into_uuid())
            .bind(record.book_uuid.into_uuid())
            .bind(&record.pickup.name)
            .bind(&record.pickup.address)
            .bind(&record.pickup.city)
            .bind(&record.pickup.pincode)
            .bind(SqlxTimestamp::from(record.borrow_date))
            .bind(SqlxTimestamp::from(record.due_date))
            .bind(to_db_amount(record.deposit_amount)?)
            .bind(to_db_amount(record.rental_fee)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_borrow(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        borrow: BorrowUuid,
    ) -> Result<Option<BorrowRecord>, sqlx::Error> {
        query_as::<Postgres, BorrowRecord>(GET_BORROW_SQL)
            .bind(borrow.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_borrows(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<BorrowRecord>, sqlx::Error> {
        query_as::<Postgres, BorrowRecord>(LIST_USER_BORROWS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_active_borrows(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<BorrowRecord>, sqlx::Error> {
        query_as::<Postgres, BorrowRecord>(LIST_ACTIVE_BORROWS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Each transition query carries its own status guard; zero rows updated
    /// means the record was not in the required state (or does not exist).
    pub(crate) async fn mark_picked_up(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        borrow: BorrowUuid,
    ) -> Result<u64, sqlx::Error> {
        self.run_transition(tx, MARK_PICKED_UP_SQL, borrow).await
    }

    pub(crate) async fn mark_returned(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        borrow: BorrowUuid,
    ) -> Result<u64, sqlx::Error> {
        self.run_transition(tx, MARK_RETURNED_SQL, borrow).await
    }

    pub(crate) async fn mark_lost(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        borrow: BorrowUuid,
    ) -> Result<u64, sqlx::Error> {
        self.run_transition(tx, MARK_LOST_SQL, borrow).await
    }

    async fn run_transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sql: &str,
        borrow: BorrowUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(sql)
            .bind(borrow.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Flip every past-due Borrowed record to Overdue in a single statement.
    pub(crate) async fn flag_overdue(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(FLAG_OVERDUE_SQL)
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for BorrowRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: BorrowUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            borrower_name: row.try_get("borrower_name")?,
            borrower_email: row.try_get("borrower_email")?,
            book_uuid: BookUuid::from_uuid(row.try_get("book_uuid")?),
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            pickup: ShippingAddress {
                name: row.try_get("pickup_name")?,
                address: row.try_get("pickup_address")?,
                city: row.try_get("pickup_city")?,
                pincode: row.try_get("pickup_pincode")?,
            },
            borrow_date: row.try_get::<SqlxTimestamp, _>("borrow_date")?.to_jiff(),
            due_date: row.try_get::<SqlxTimestamp, _>("due_date")?.to_jiff(),
            return_date: row
                .try_get::<Option<SqlxTimestamp>, _>("return_date")?
                .map(SqlxTimestamp::to_jiff),
            status: try_get_parsed::<BorrowStatus, _>(row, "status")?,
            deposit_amount: try_get_amount(row, "deposit_amount")?,
            rental_fee: try_get_amount(row, "rental_fee")?,
            is_deposit_refunded: row.try_get("is_deposit_refunded")?,
            is_returned_in_good_condition: row.try_get("is_returned_in_good_condition")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
