//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::books::{
        errors::CatalogServiceError,
        models::{Book, BookUuid, NewBook},
        repository::PgBooksRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgBooksRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgBooksRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_available(&self) -> Result<Vec<Book>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let books = self.repository.list_available(&mut tx).await?;

        tx.commit().await?;

        Ok(books)
    }

    async fn search(&self, term: &str) -> Result<Vec<Book>, CatalogServiceError> {
        let term = term.trim();

        // An empty query is the same as listing everything available.
        if term.is_empty() {
            return self.list_available().await;
        }

        let mut tx = self.db.begin().await?;

        let books = self.repository.search(&mut tx, term).await?;

        tx.commit().await?;

        Ok(books)
    }

    async fn get_book(&self, uuid: BookUuid) -> Result<Book, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let book = self.repository.get_book(&mut tx, uuid).await?;

        tx.commit().await?;

        Ok(book)
    }

    async fn create_book(&self, book: NewBook) -> Result<Book, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_book(&mut tx, &book).await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List every book with purchasable or borrowable copies.
    async fn list_available(&self) -> Result<Vec<Book>, CatalogServiceError>;

    /// Case-insensitive substring search over title and author.
    ///
    /// An empty or whitespace-only term behaves exactly like
    /// [`CatalogService::list_available`].
    async fn search(&self, term: &str) -> Result<Vec<Book>, CatalogServiceError>;

    /// Retrieve a single book.
    async fn get_book(&self, uuid: BookUuid) -> Result<Book, CatalogServiceError>;

    /// Add a book to the catalog (seeding and operator tooling).
    async fn create_book(&self, book: NewBook) -> Result<Book, CatalogServiceError>;
}
