//! Borrow Models

use std::str::FromStr;

use jiff::{SignedDuration, Timestamp};
use thiserror::Error;

use crate::{
    domain::{books::models::BookUuid, orders::models::ShippingAddress, users::models::UserUuid},
    uuids::TypedUuid,
};

/// Flat per-loan rental fee, in minor currency units.
pub const RENTAL_FEE: u64 = 2500;

/// Loans run for exactly fourteen days from the moment of reservation.
pub const BORROW_PERIOD: SignedDuration = SignedDuration::from_hours(14 * 24);

/// Borrow record UUID
pub type BorrowUuid = TypedUuid<BorrowRecord>;

/// Borrow lifecycle. `Reserved -> Borrowed -> Returned` is the happy path;
/// the overdue sweep produces `Overdue`, an admin action produces `Lost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowStatus {
    Reserved,
    Borrowed,
    Overdue,
    Returned,
    Lost,
}

impl BorrowStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reserved => "Reserved",
            Self::Borrowed => "Borrowed",
            Self::Overdue => "Overdue",
            Self::Returned => "Returned",
            Self::Lost => "Lost",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown borrow status")]
pub struct ParseBorrowStatusError;

impl FromStr for BorrowStatus {
    type Err = ParseBorrowStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Reserved" => Ok(Self::Reserved),
            "Borrowed" => Ok(Self::Borrowed),
            "Overdue" => Ok(Self::Overdue),
            "Returned" => Ok(Self::Returned),
            "Lost" => Ok(Self::Lost),
            _ => Err(ParseBorrowStatusError),
        }
    }
}

/// Administrative action on a borrow record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowAction {
    Pickup,
    Return,
    Lost,
}

#[derive(Debug, Error)]
#[error("unknown borrow action")]
pub struct ParseBorrowActionError;

impl FromStr for BorrowAction {
    type Err = ParseBorrowActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pickup" => Ok(Self::Pickup),
            "return" => Ok(Self::Return),
            "lost" => Ok(Self::Lost),
            _ => Err(ParseBorrowActionError),
        }
    }
}

/// New Borrow Model
///
/// The client echoes the deposit and rental fee it displayed; the server
/// recomputes both and rejects the request when either differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBorrow {
    pub uuid: BorrowUuid,
    pub book_uuid: BookUuid,
    pub pickup: ShippingAddress,
    pub client_deposit: u64,
    pub client_rental_fee: u64,
}

/// Borrow Record Model
#[derive(Debug, Clone)]
pub struct BorrowRecord {
    pub uuid: BorrowUuid,
    pub user_uuid: UserUuid,
    pub borrower_name: String,
    pub borrower_email: String,
    pub book_uuid: BookUuid,
    pub title: String,
    pub author: String,
    pub pickup: ShippingAddress,
    pub borrow_date: Timestamp,
    pub due_date: Timestamp,
    pub return_date: Option<Timestamp>,
    pub status: BorrowStatus,
    pub deposit_amount: u64,
    pub rental_fee: u64,
    pub is_deposit_refunded: bool,
    pub is_returned_in_good_condition: Option<bool>,
    pub created_at: Timestamp,
}
