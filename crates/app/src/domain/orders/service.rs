//! Orders service.

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    auth::AuthSession,
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        models::{NewOrder, Order, OrderItem, OrderUuid},
        repository::{OrderRow, PgOrdersRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let ids: Vec<OrderUuid> = rows.iter().map(|row| row.uuid).collect();

        let mut items_by_order: HashMap<OrderUuid, Vec<OrderItem>> = HashMap::new();

        for item_row in self.repository.list_items_for_orders(tx, &ids).await? {
            items_by_order
                .entry(item_row.order_uuid)
                .or_default()
                .push(item_row.item);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.uuid).unwrap_or_default();
                row.into_order(items)
            })
            .collect())
    }

    async fn load_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let row = self
            .repository
            .get_order(tx, uuid)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        let mut orders = self.attach_items(tx, vec![row]).await?;

        orders.pop().ok_or(OrdersServiceError::NotFound)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, session, order),
        fields(order_uuid = %order.uuid, line_count = order.lines.len()),
        err
    )]
    async fn place_order(
        &self,
        session: &AuthSession,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        if order.lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        if order.shipping.name.trim().is_empty()
            || order.shipping.address.trim().is_empty()
            || order.shipping.city.trim().is_empty()
            || order.shipping.pincode.trim().is_empty()
        {
            return Err(OrdersServiceError::MissingRequiredData);
        }

        // Quantities are stored in an INTEGER column; anything past that
        // bound is rejected as malformed input rather than a storage fault.
        if order
            .lines
            .iter()
            .any(|line| line.quantity == 0 || i32::try_from(line.quantity).is_err())
        {
            return Err(OrdersServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        // Recompute the total from the catalog while decrementing stock; the
        // client's figure is only accepted when it matches exactly. Any error
        // before the commit rolls back every decrement.
        let mut total: u64 = 0;
        let mut priced_lines = Vec::with_capacity(order.lines.len());

        for line in &order.lines {
            let book = self
                .repository
                .get_book_for_order(&mut tx, line.book_uuid)
                .await?
                .ok_or(OrdersServiceError::BookNotFound)?;

            let updated = self
                .repository
                .decrement_stock(&mut tx, line.book_uuid, line.quantity)
                .await?;

            if updated == 0 {
                return Err(OrdersServiceError::InsufficientStock { title: book.title });
            }

            // An overflowing total can never match a client figure.
            let line_total = book
                .price
                .checked_mul(u64::from(line.quantity))
                .ok_or(OrdersServiceError::TotalMismatch)?;
            total = total
                .checked_add(line_total)
                .ok_or(OrdersServiceError::TotalMismatch)?;

            priced_lines.push((line.book_uuid, line.quantity, book.price));
        }

        if total != order.client_total {
            return Err(OrdersServiceError::TotalMismatch);
        }

        self.repository
            .insert_order(&mut tx, order.uuid, session.user_uuid, &order.shipping, total)
            .await?;

        for (book_uuid, quantity, price_at_purchase) in priced_lines {
            self.repository
                .insert_order_item(&mut tx, order.uuid, book_uuid, quantity, price_at_purchase)
                .await?;
        }

        let placed = self.load_order(&mut tx, order.uuid).await?;

        tx.commit().await?;

        Ok(placed)
    }

    async fn list_user_orders(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows = self.repository.list_user_orders(&mut tx, session.user_uuid).await?;
        let orders = self.attach_items(&mut tx, rows).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_pending_orders(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        if !session.is_admin() {
            return Err(OrdersServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let rows = self.repository.list_pending_orders(&mut tx).await?;
        let orders = self.attach_items(&mut tx, rows).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.mark_shipped",
        skip(self, session),
        fields(order_uuid = %order),
        err
    )]
    async fn mark_shipped(
        &self,
        session: &AuthSession,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        if !session.is_admin() {
            return Err(OrdersServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let updated = self.repository.mark_shipped(&mut tx, order).await?;

        if updated == 0 {
            // Distinguish a missing order from one already past Processing.
            return match self.repository.get_order(&mut tx, order).await? {
                Some(_) => Err(OrdersServiceError::InvalidTransition),
                None => Err(OrdersServiceError::NotFound),
            };
        }

        let shipped = self.load_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(shipped)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order for the session's user.
    ///
    /// Stock is decremented and the total verified inside one transaction;
    /// nothing is persisted when any line fails.
    async fn place_order(
        &self,
        session: &AuthSession,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// The session's own orders, newest first.
    async fn list_user_orders(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// All orders still awaiting fulfilment, oldest first. Administrators
    /// only.
    async fn list_pending_orders(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// Move a processing order to shipped. Administrators only.
    async fn mark_shipped(
        &self,
        session: &AuthSession,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;
}
