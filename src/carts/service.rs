use sqlx::PgPool;
use std::sync::Arc;

use crate::carts::{repository, AddCartItemRequest, Cart, CartResponse, CartStatus};
use crate::catalog;
use crate::config::PricingSettings;
use crate::error::ApiError;
use crate::pricing::PriceCalculator;
use crate::validation::MAX_LINE_QUANTITY;

/// Service for cart reads and direct cart edits
#[derive(Clone)]
pub struct CartService {
    pool: PgPool,
    settings: Arc<PricingSettings>,
}

impl CartService {
    pub fn new(pool: PgPool, settings: Arc<PricingSettings>) -> Self {
        Self { pool, settings }
    }

    /// Cart with items and computed totals
    pub async fn get_cart(&self, cart_id: i32) -> Result<CartResponse, ApiError> {
        let cart = repository::find_by_id(&self.pool, cart_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Cart", cart_id))?;
        let items = repository::find_items(&self.pool, cart.id).await?;

        Ok(CartResponse::new(cart, items))
    }

    /// Add a product to an active cart
    ///
    /// Quantities accumulate on an existing line, and the line snapshot is
    /// recomputed at the product's current price.
    pub async fn add_item(&self, cart_id: i32, request: AddCartItemRequest) -> Result<CartResponse, ApiError> {
        let mut tx = self.pool.begin().await?;

        let cart = repository::find_by_id_for_update(&mut *tx, cart_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Cart", cart_id))?;
        ensure_active(&cart)?;

        let product = catalog::repository::find_by_id(&mut *tx, request.product_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product", request.product_id))?;

        let existing = repository::find_item(&mut *tx, cart.id, product.id)
            .await?
            .map(|item| item.quantity)
            .unwrap_or(0);
        let quantity = existing + request.quantity;
        if quantity > MAX_LINE_QUANTITY {
            return Err(ApiError::BadRequest(format!(
                "Quantity for product {} would exceed {}",
                product.id, MAX_LINE_QUANTITY
            )));
        }

        let line = PriceCalculator::line(product.unit_price(), quantity, self.settings.tax_percent);
        repository::upsert_item(&mut *tx, cart.id, product.id, &line).await?;
        let cart = repository::touch(&mut *tx, cart.id).await?;
        let items = repository::find_items(&mut *tx, cart.id).await?;

        tx.commit().await?;

        tracing::info!(
            "Cart {}: product {} now at quantity {}",
            cart.id,
            product.id,
            quantity
        );
        Ok(CartResponse::new(cart, items))
    }

    /// Remove a product line from an active cart
    pub async fn remove_item(&self, cart_id: i32, product_id: i32) -> Result<CartResponse, ApiError> {
        let mut tx = self.pool.begin().await?;

        let cart = repository::find_by_id_for_update(&mut *tx, cart_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Cart", cart_id))?;
        ensure_active(&cart)?;

        if !repository::remove_item(&mut *tx, cart.id, product_id).await? {
            return Err(ApiError::not_found("Cart item", product_id));
        }

        let cart = repository::touch(&mut *tx, cart.id).await?;
        let items = repository::find_items(&mut *tx, cart.id).await?;

        tx.commit().await?;

        tracing::info!("Cart {}: removed product {}", cart.id, product_id);
        Ok(CartResponse::new(cart, items))
    }
}

/// Rejects edits to carts that were already checked out
pub(crate) fn ensure_active(cart: &Cart) -> Result<(), ApiError> {
    if cart.status == CartStatus::Active {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Cart {} is {} and cannot be modified",
            cart.id, cart.status
        )))
    }
}
