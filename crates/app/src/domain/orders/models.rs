//! Order Models

use std::str::FromStr;

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{books::models::BookUuid, users::models::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order lifecycle. Transitions are forward-only; only
/// `Processing -> Shipped` is exposed through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown order status")]
pub struct ParseOrderStatusError;

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseOrderStatusError),
        }
    }
}

/// Delivery (or pickup) address captured with a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddress {
    pub name: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

/// One requested cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub book_uuid: BookUuid,
    pub quantity: u32,
}

/// New Order Model
///
/// `client_total` is the figure the client computed for display; the server
/// recomputes the authoritative total and rejects the order on mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub lines: Vec<OrderLine>,
    pub shipping: ShippingAddress,
    pub client_total: u64,
}

/// A persisted order line with its price snapshot and display metadata.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: uuid::Uuid,
    pub book_uuid: BookUuid,
    pub title: String,
    pub author: String,
    pub quantity: u32,
    /// Snapshot taken at purchase time; never recomputed from the catalog.
    pub price_at_purchase: u64,
}

/// Order Model
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    pub shipping: ShippingAddress,
    pub total_price: u64,
    pub status: OrderStatus,
    pub is_paid: bool,
    pub created_at: Timestamp,
}
