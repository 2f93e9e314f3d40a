//! Place Borrow Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookflow_app::domain::borrows::models::{BorrowRecord, BorrowUuid, NewBorrow};

use crate::{
    borrows::into_status_error, extensions::*, orders::handlers::create::AddressPayload,
    state::State,
};

/// Place Borrow Request
///
/// `deposit` and `rental_fee` are the figures the client displayed, in
/// pence/cents; the server recomputes both and rejects on mismatch.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceBorrowRequest {
    pub book_uuid: Uuid,
    pub pickup: AddressPayload,
    pub deposit: u64,
    pub rental_fee: u64,
}

/// Borrow Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BorrowResponse {
    /// The unique identifier of the borrow record
    pub uuid: Uuid,

    /// The name on the borrowing account
    pub borrower_name: String,

    /// The email on the borrowing account
    pub borrower_email: String,

    /// The unique identifier of the borrowed book
    pub book_uuid: Uuid,

    /// The title of the borrowed book
    pub title: String,

    /// The author of the borrowed book
    pub author: String,

    /// The pickup address
    pub pickup: AddressPayload,

    /// The date and time the loan was reserved
    pub borrow_date: String,

    /// The date and time the loan falls due
    pub due_date: String,

    /// The date and time the copy came back, if it has
    pub return_date: Option<String>,

    /// The current lifecycle status
    pub status: String,

    /// The refundable deposit in pence/cents
    pub deposit_amount: u64,

    /// The flat rental fee in pence/cents
    pub rental_fee: u64,

    pub is_deposit_refunded: bool,

    /// Set when the copy is returned and inspected
    pub is_returned_in_good_condition: Option<bool>,

    /// The date and time the record was created
    pub created_at: String,
}

impl From<BorrowRecord> for BorrowResponse {
    fn from(record: BorrowRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            borrower_name: record.borrower_name,
            borrower_email: record.borrower_email,
            book_uuid: record.book_uuid.into_uuid(),
            title: record.title,
            author: record.author,
            pickup: record.pickup.into(),
            borrow_date: record.borrow_date.to_string(),
            due_date: record.due_date.to_string(),
            return_date: record.return_date.as_ref().map(ToString::to_string),
            status: record.status.as_str().to_string(),
            deposit_amount: record.deposit_amount,
            rental_fee: record.rental_fee,
            is_deposit_refunded: record.is_deposit_refunded,
            is_returned_in_good_condition: record.is_returned_in_good_condition,
            created_at: record.created_at.to_string(),
        }
    }
}

/// Place Borrow Handler
///
/// Reserves one borrowable copy for the authenticated user.
#[endpoint(
    tags("borrows"),
    summary = "Borrow Book",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Copy reserved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing address or stale fees"),
        (status_code = StatusCode::NOT_FOUND, description = "Book not found"),
        (status_code = StatusCode::CONFLICT, description = "No borrowable copies available"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceBorrowRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<BorrowResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;
    let request = json.into_inner();

    let record = state
        .app
        .borrows
        .place_borrow(
            &session,
            NewBorrow {
                uuid: BorrowUuid::new(),
                book_uuid: request.book_uuid.into(),
                pickup: request.pickup.into(),
                client_deposit: request.deposit,
                client_rental_fee: request.rental_fee,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(record.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookflow_app::domain::borrows::{BorrowsServiceError, MockBorrowsService};

    use crate::test_helpers::{MockServices, TEST_USER_SESSION, authed_service, make_borrow};

    use super::*;

    fn make_service(borrows: MockBorrowsService) -> Service {
        let mocks = MockServices {
            borrows,
            ..MockServices::default()
        };

        authed_service(
            mocks,
            TEST_USER_SESSION,
            Router::with_path("transactions/borrow").post(handler),
        )
    }

    fn request_body(deposit: u64) -> serde_json::Value {
        json!({
            "book_uuid": Uuid::now_v7(),
            "pickup": {
                "name": "Pat",
                "address": "1 High St",
                "city": "Leeds",
                "pincode": "LS1 1AA",
            },
            "deposit": deposit,
            "rental_fee": 2500,
        })
    }

    #[tokio::test]
    async fn test_borrow_returns_201() -> TestResult {
        let mut borrows = MockBorrowsService::new();

        borrows
            .expect_place_borrow()
            .once()
            .withf(|session, borrow| {
                *session == TEST_USER_SESSION && borrow.client_rental_fee == 2500
            })
            .return_once(|session, borrow| {
                Ok(make_borrow(session.user_uuid, borrow.uuid))
            });

        let mut res = TestClient::post("http://example.com/transactions/borrow")
            .json(&request_body(999))
            .send(&make_service(borrows))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: BorrowResponse = res.take_json().await?;
        assert_eq!(body.status, "Reserved");
        assert_eq!(body.rental_fee, 2500);

        Ok(())
    }

    #[tokio::test]
    async fn test_stale_fees_return_400() -> TestResult {
        let mut borrows = MockBorrowsService::new();

        borrows
            .expect_place_borrow()
            .once()
            .return_once(|_, _| Err(BorrowsServiceError::FeeMismatch));

        let res = TestClient::post("http://example.com/transactions/borrow")
            .json(&request_body(1))
            .send(&make_service(borrows))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_no_copies_returns_409() -> TestResult {
        let mut borrows = MockBorrowsService::new();

        borrows
            .expect_place_borrow()
            .once()
            .return_once(|_, _| Err(BorrowsServiceError::Unavailable));

        let res = TestClient::post("http://example.com/transactions/borrow")
            .json(&request_body(999))
            .send(&make_service(borrows))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
