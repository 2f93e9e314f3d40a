//! Order Errors

use bookflow_app::domain::orders::OrdersServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyCart => StatusError::bad_request().brief("Order has no items"),
        OrdersServiceError::BookNotFound => {
            StatusError::not_found().brief("A requested book is not in the catalog")
        }
        OrdersServiceError::InsufficientStock { title } => {
            StatusError::conflict().brief(format!("Not enough copies of {title} in stock"))
        }
        OrdersServiceError::TotalMismatch => {
            StatusError::bad_request().brief("Submitted total does not match current prices")
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InvalidTransition => {
            StatusError::conflict().brief("Order is not in a shippable state")
        }
        OrdersServiceError::Forbidden => {
            StatusError::forbidden().brief("Operation requires an administrator")
        }
        OrdersServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Shipping name, address, city and pincode are required")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
