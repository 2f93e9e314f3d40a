//! BookFlow Domain Concerns

pub mod books;
pub mod borrows;
pub mod lending;
pub mod orders;
pub mod reports;
pub mod users;

pub(crate) mod row;
