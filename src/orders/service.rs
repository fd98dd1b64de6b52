use sqlx::PgPool;
use std::sync::Arc;

use crate::carts::{self, service::ensure_active, CartStatus};
use crate::config::PricingSettings;
use crate::error::ApiError;
use crate::formatting::format_code;
use crate::notifications::{self, NewNotification, NotificationKind};
use crate::orders::{repository, Order, OrderResponse, OrderStatus, StatusMachine};
use crate::pricing::{LineSnapshot, PriceCalculator};

const SOURCE_TABLE: &str = "orders";

/// Service for order business logic
#[derive(Clone)]
pub struct OrderService {
    pool: PgPool,
    settings: Arc<PricingSettings>,
}

impl OrderService {
    pub fn new(pool: PgPool, settings: Arc<PricingSettings>) -> Self {
        Self { pool, settings }
    }

    /// Turn an active cart into a pending order
    ///
    /// # Validation
    /// - Cart must exist, be active and contain at least one line
    ///
    /// Lines are copied with the snapshot they carry in the cart. The order
    /// id is reserved from the sequence first so the final code is written
    /// with the insert.
    pub async fn checkout(&self, cart_id: i32) -> Result<OrderResponse, ApiError> {
        let mut tx = self.pool.begin().await?;

        let cart = carts::repository::find_by_id_for_update(&mut *tx, cart_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Cart", cart_id))?;
        ensure_active(&cart)?;

        let cart_items = carts::repository::find_items(&mut *tx, cart.id).await?;
        if cart_items.is_empty() {
            return Err(ApiError::BadRequest(format!("Cart {} is empty", cart.id)));
        }

        let lines: Vec<(i32, LineSnapshot)> = cart_items
            .iter()
            .map(|item| (item.product_id, item.snapshot()))
            .collect();
        let totals = PriceCalculator::totals(lines.iter().map(|(_, line)| line));

        let id = repository::reserve_id(&mut *tx).await?;
        let code = format_code(&self.settings.order_code_prefix, i64::from(id), self.settings.code_width);
        let order = repository::insert(&mut *tx, id, &code, cart.id, cart.customer_id, &totals).await?;

        let mut items = Vec::with_capacity(lines.len());
        for (product_id, line) in &lines {
            items.push(repository::insert_item(&mut *tx, order.id, *product_id, line).await?);
        }

        carts::repository::set_status(&mut *tx, cart.id, CartStatus::CheckedOut).await?;

        notifications::repository::create(&mut *tx, &created_notification(&order, items.len())).await?;

        tx.commit().await?;

        tracing::info!(
            "Checked out cart {} into order {} (total {})",
            cart.id,
            order.code,
            order.total
        );
        Ok(OrderResponse::new(order, items))
    }

    /// Get a specific order by ID
    pub async fn get_order(&self, order_id: i32) -> Result<OrderResponse, ApiError> {
        let order = repository::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", order_id))?;
        let items = repository::find_items(&self.pool, order.id).await?;

        Ok(OrderResponse::new(order, items))
    }

    /// Update order status
    ///
    /// # Validation
    /// - Order must exist
    /// - Status transition must be valid according to StatusMachine
    pub async fn update_status(&self, order_id: i32, new_status: OrderStatus) -> Result<OrderResponse, ApiError> {
        let mut tx = self.pool.begin().await?;

        let order = repository::find_by_id_for_update(&mut *tx, order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", order_id))?;

        StatusMachine::transition(order.status, new_status).map_err(|_| ApiError::InvalidTransition {
            from: order.status.to_string(),
            to: new_status.to_string(),
        })?;

        let updated = repository::update_status(&mut *tx, order.id, new_status).await?;
        let items = repository::find_items(&mut *tx, order.id).await?;

        tx.commit().await?;

        tracing::info!("Order {} status {} -> {}", updated.code, order.status, updated.status);
        Ok(OrderResponse::new(updated, items))
    }
}

fn created_notification(order: &Order, item_count: usize) -> NewNotification {
    NewNotification {
        kind: NotificationKind::OrderCreated,
        source_table: SOURCE_TABLE,
        source_id: order.id,
        title: format!("New order {}", order.code),
        detail: format!(
            "Cart {} checked out with {} item(s), total {}",
            order.cart_id, item_count, order.total
        ),
    }
}
