//! Catalog Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Book UUID
pub type BookUuid = TypedUuid<Book>;

/// Book Model
///
/// `stock_count` tracks copies available for purchase; `borrowable_count`
/// tracks copies available for loan. Both are decremented only through the
/// order and borrow subsystems.
#[derive(Debug, Clone)]
pub struct Book {
    pub uuid: BookUuid,
    pub title: String,
    pub author: String,
    pub price: u64,
    pub stock_count: u32,
    pub borrowable_count: u32,
    pub img_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Book Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub uuid: BookUuid,
    pub title: String,
    pub author: String,
    pub price: u64,
    pub stock_count: u32,
    pub borrowable_count: u32,
    pub img_url: Option<String>,
}
