//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    books::models::{Book, BookUuid, NewBook},
    row::{try_get_amount, try_get_count},
};

const LIST_AVAILABLE_SQL: &str = include_str!("sql/list_available.sql");
const SEARCH_SQL: &str = include_str!("sql/search.sql");
const GET_BOOK_SQL: &str = include_str!("sql/get_book.sql");
const CREATE_BOOK_SQL: &str = include_str!("sql/create_book.sql");
const FIND_BY_TITLE_AUTHOR_SQL: &str = include_str!("sql/find_by_title_author.sql");
const ADD_BORROWABLE_COPIES_SQL: &str = include_str!("sql/add_borrowable_copies.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBooksRepository;

impl PgBooksRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_available(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Book>, sqlx::Error> {
        query_as::<Postgres, Book>(LIST_AVAILABLE_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn search(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        term: &str,
    ) -> Result<Vec<Book>, sqlx::Error> {
        query_as::<Postgres, Book>(SEARCH_SQL)
            .bind(term)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<Book, sqlx::Error> {
        query_as::<Postgres, Book>(GET_BOOK_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: &NewBook,
    ) -> Result<Book, sqlx::Error> {
        query_as::<Postgres, Book>(CREATE_BOOK_SQL)
            .bind(book.uuid.into_uuid())
            .bind(&book.title)
            .bind(&book.author)
            .bind(to_db_amount(book.price)?)
            .bind(to_db_count(book.stock_count)?)
            .bind(to_db_count(book.borrowable_count)?)
            .bind(book.img_url.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_title_author(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        title: &str,
        author: &str,
    ) -> Result<Option<Book>, sqlx::Error> {
        query_as::<Postgres, Book>(FIND_BY_TITLE_AUTHOR_SQL)
            .bind(title)
            .bind(author)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn add_borrowable_copies(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        copies: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(ADD_BORROWABLE_COPIES_SQL)
            .bind(book.into_uuid())
            .bind(to_db_count(copies)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

pub(crate) fn to_db_amount(amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

pub(crate) fn to_db_count(count: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(count).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

impl<'r> FromRow<'r, PgRow> for Book {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: BookUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            price: try_get_amount(row, "price")?,
            stock_count: try_get_count(row, "stock_count")?,
            borrowable_count: try_get_count(row, "borrowable_count")?,
            img_url: row.try_get("img_url")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
