//! Place Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookflow_app::domain::orders::models::{
    NewOrder, Order, OrderItem, OrderLine, OrderUuid, ShippingAddress,
};

use crate::{extensions::*, orders::into_status_error, state::State};

/// One requested cart line.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineRequest {
    pub book_uuid: Uuid,
    pub quantity: u32,
}

/// Shipping Address
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressPayload {
    pub name: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

impl From<AddressPayload> for ShippingAddress {
    fn from(payload: AddressPayload) -> Self {
        Self {
            name: payload.name,
            address: payload.address,
            city: payload.city,
            pincode: payload.pincode,
        }
    }
}

impl From<ShippingAddress> for AddressPayload {
    fn from(shipping: ShippingAddress) -> Self {
        Self {
            name: shipping.name,
            address: shipping.address,
            city: shipping.city,
            pincode: shipping.pincode,
        }
    }
}

/// Place Order Request
///
/// `total` is the client's own figure in pence/cents; the server recomputes
/// it and rejects the order on mismatch.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderRequest {
    pub items: Vec<OrderLineRequest>,
    pub shipping: AddressPayload,
    pub total: u64,
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub book_uuid: Uuid,
    pub title: String,
    pub author: String,
    pub quantity: u32,

    /// The unit price snapshot taken at purchase time, in pence/cents
    pub price_at_purchase: u64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            book_uuid: item.book_uuid.into_uuid(),
            title: item.title,
            author: item.author,
            quantity: item.quantity,
            price_at_purchase: item.price_at_purchase,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// The name on the purchasing account
    pub customer_name: String,

    /// The email on the purchasing account
    pub customer_email: String,

    /// The ordered lines with their price snapshots
    pub items: Vec<OrderItemResponse>,

    /// The delivery address
    pub shipping: AddressPayload,

    /// The order total in pence/cents
    pub total_price: u64,

    /// The current lifecycle status
    pub status: String,

    pub is_paid: bool,

    /// The date and time the order was placed
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            shipping: order.shipping.into(),
            total_price: order.total_price,
            status: order.status.as_str().to_string(),
            is_paid: order.is_paid,
            created_at: order.created_at.to_string(),
        }
    }
}

/// Place Order Handler
///
/// Places an order for the authenticated user.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart, missing address or stale total"),
        (status_code = StatusCode::NOT_FOUND, description = "A requested book is not in the catalog"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.auth_session_or_401()?;
    let request = json.into_inner();

    let order = state
        .app
        .orders
        .place_order(
            &session,
            NewOrder {
                uuid: OrderUuid::new(),
                lines: request
                    .items
                    .into_iter()
                    .map(|line| OrderLine {
                        book_uuid: line.book_uuid.into(),
                        quantity: line.quantity,
                    })
                    .collect(),
                shipping: request.shipping.into(),
                client_total: request.total,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookflow_app::domain::orders::{MockOrdersService, OrdersServiceError};

    use crate::test_helpers::{MockServices, TEST_USER_SESSION, authed_service, make_order};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let mocks = MockServices {
            orders,
            ..MockServices::default()
        };

        authed_service(
            mocks,
            TEST_USER_SESSION,
            Router::with_path("transactions/order").post(handler),
        )
    }

    fn request_body(total: u64) -> serde_json::Value {
        json!({
            "items": [{ "book_uuid": Uuid::now_v7(), "quantity": 2 }],
            "shipping": {
                "name": "Pat",
                "address": "1 High St",
                "city": "Leeds",
                "pincode": "LS1 1AA",
            },
            "total": total,
        })
    }

    #[tokio::test]
    async fn test_place_order_returns_201() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(|session, order| {
                *session == TEST_USER_SESSION && order.client_total == 3998
            })
            .return_once(|session, order| Ok(make_order(session.user_uuid, order.uuid)));

        let mut res = TestClient::post("http://example.com/transactions/order")
            .json(&request_body(3998))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: OrderResponse = res.take_json().await?;
        assert_eq!(body.status, "Processing");
        assert!(body.is_paid);

        Ok(())
    }

    #[tokio::test]
    async fn test_stale_total_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::TotalMismatch));

        let res = TestClient::post("http://example.com/transactions/order")
            .json(&request_body(1))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_stock_returns_409() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_place_order().once().return_once(|_, _| {
            Err(OrdersServiceError::InsufficientStock {
                title: "Dune".to_string(),
            })
        });

        let res = TestClient::post("http://example.com/transactions/order")
            .json(&request_body(3998))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_book_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::BookNotFound));

        let res = TestClient::post("http://example.com/transactions/order")
            .json(&request_body(3998))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
