//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    books::{
        models::{Book, BookUuid},
        repository::{to_db_amount, to_db_count},
    },
    orders::models::{Order, OrderItem, OrderStatus, OrderUuid, ShippingAddress},
    row::{try_get_amount, try_get_count, try_get_parsed},
    users::models::UserUuid,
};

const GET_BOOK_FOR_ORDER_SQL: &str = include_str!("sql/get_book_for_order.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const INSERT_ORDER_ITEM_SQL: &str = include_str!("sql/insert_order_item.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("sql/list_user_orders.sql");
const LIST_PENDING_ORDERS_SQL: &str = include_str!("sql/list_pending_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ITEMS_FOR_ORDERS_SQL: &str = include_str!("sql/list_items_for_orders.sql");
const MARK_SHIPPED_SQL: &str = include_str!("sql/mark_shipped.sql");

/// An order row without its items; the service stitches items in afterwards.
#[derive(Debug, Clone)]
pub(crate) struct OrderRow {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub customer_name: String,
    pub customer_email: String,
    pub shipping: ShippingAddress,
    pub total_price: u64,
    pub status: OrderStatus,
    pub is_paid: bool,
    pub created_at: jiff::Timestamp,
}

impl OrderRow {
    pub(crate) fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            uuid: self.uuid,
            user_uuid: self.user_uuid,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            items,
            shipping: self.shipping,
            total_price: self.total_price,
            status: self.status,
            is_paid: self.is_paid,
            created_at: self.created_at,
        }
    }
}

/// An item row tagged with its parent order for grouping.
#[derive(Debug, Clone)]
pub(crate) struct ItemRow {
    pub order_uuid: OrderUuid,
    pub item: OrderItem,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Fetch a book and take a row lock on it so concurrent orders for the
    /// same title serialize.
    pub(crate) async fn get_book_for_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<Option<Book>, sqlx::Error> {
        query_as::<Postgres, Book>(GET_BOOK_FOR_ORDER_SQL)
            .bind(book.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Decrement stock only when enough copies remain. Returns the number of
    /// rows updated; zero means the stock guard failed.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(book.into_uuid())
            .bind(to_db_count(quantity)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: OrderUuid,
        user: UserUuid,
        shipping: &ShippingAddress,
        total_price: u64,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_ORDER_SQL)
            .bind(uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(&shipping.name)
            .bind(&shipping.address)
            .bind(&shipping.city)
            .bind(&shipping.pincode)
            .bind(to_db_amount(total_price)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn insert_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        book: BookUuid,
        quantity: u32,
        price_at_purchase: u64,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_ORDER_ITEM_SQL)
            .bind(Uuid::now_v7())
            .bind(order.into_uuid())
            .bind(book.into_uuid())
            .bind(to_db_count(quantity)?)
            .bind(to_db_amount(price_at_purchase)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRow>, sqlx::Error> {
        query_as::<Postgres, OrderRow>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_pending_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderRow>, sqlx::Error> {
        query_as::<Postgres, OrderRow>(LIST_PENDING_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<OrderRow>, sqlx::Error> {
        query_as::<Postgres, OrderRow>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_items_for_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<ItemRow>, sqlx::Error> {
        let ids: Vec<Uuid> = orders.iter().map(|o| o.into_uuid()).collect();

        query_as::<Postgres, ItemRow>(LIST_ITEMS_FOR_ORDERS_SQL)
            .bind(ids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Move an order to `Shipped`. Returns the number of rows updated; zero
    /// means the order either does not exist or has already moved past
    /// `Processing`.
    pub(crate) async fn mark_shipped(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_SHIPPED_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            shipping: ShippingAddress {
                name: row.try_get("ship_to_name")?,
                address: row.try_get("ship_to_address")?,
                city: row.try_get("ship_to_city")?,
                pincode: row.try_get("ship_to_pincode")?,
            },
            total_price: try_get_amount(row, "total_price")?,
            status: try_get_parsed::<OrderStatus, _>(row, "status")?,
            is_paid: row.try_get("is_paid")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderItem {
                uuid: row.try_get("uuid")?,
                book_uuid: BookUuid::from_uuid(row.try_get("book_uuid")?),
                title: row.try_get("title")?,
                author: row.try_get("author")?,
                quantity: try_get_count(row, "quantity")?,
                price_at_purchase: try_get_amount(row, "price_at_purchase")?,
            },
        })
    }
}
