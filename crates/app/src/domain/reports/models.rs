//! Report Models

/// Point-in-time rollup for the admin dashboard. Recomputed on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSummary {
    pub total_users: u64,
    pub admin_users: u64,
    pub total_books: u64,
    pub pending_orders: u64,
    pub active_borrows: u64,
    pub pending_submissions: u64,
}
