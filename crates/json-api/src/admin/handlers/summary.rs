//! Admin Summary Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use bookflow_app::domain::reports::models::AdminSummary;

use crate::{admin::reports_into_status_error, extensions::*, state::State};

/// Admin Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SummaryResponse {
    /// All registered accounts, admins included
    pub total_users: u64,

    /// Accounts with the admin role
    pub admin_users: u64,

    /// Titles in the catalog
    pub total_books: u64,

    /// Orders awaiting fulfilment
    pub pending_orders: u64,

    /// Borrow records still out
    pub active_borrows: u64,

    /// Lend submissions awaiting review
    pub pending_submissions: u64,
}

impl From<AdminSummary> for SummaryResponse {
    fn from(summary: AdminSummary) -> Self {
        Self {
            total_users: summary.total_users,
            admin_users: summary.admin_users,
            total_books: summary.total_books,
            pending_orders: summary.pending_orders,
            active_borrows: summary.active_borrows,
            pending_submissions: summary.pending_submissions,
        }
    }
}

/// Admin Summary Handler
///
/// Returns the current dashboard counts. Administrators only.
#[endpoint(
    tags("admin"),
    summary = "Admin Summary",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<SummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;

    let summary = state
        .app
        .reports
        .admin_summary(&session)
        .await
        .map_err(reports_into_status_error)?;

    Ok(Json(summary.into()))
}
