use sqlx::PgExecutor;

use crate::carts::{Cart, CartItem, CartStatus};
use crate::error::ApiError;
use crate::pricing::LineSnapshot;

const CART_COLUMNS: &str = "id, customer_id, status, created_at, updated_at";

const CART_ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, unit_price, subtotal, tax_percent, \
     tax_amount, total, created_at, updated_at";

/// Create an empty active cart
pub async fn create<'e, E>(executor: E, customer_id: Option<i32>) -> Result<Cart, ApiError>
where
    E: PgExecutor<'e>,
{
    let cart = sqlx::query_as::<_, Cart>(&format!(
        "INSERT INTO carts (customer_id, status) VALUES ($1, $2) RETURNING {}",
        CART_COLUMNS
    ))
    .bind(customer_id)
    .bind(CartStatus::Active)
    .fetch_one(executor)
    .await?;

    tracing::debug!("Created cart {} for customer {:?}", cart.id, customer_id);
    Ok(cart)
}

/// Find a cart by ID
pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Cart>, ApiError>
where
    E: PgExecutor<'e>,
{
    let cart = sqlx::query_as::<_, Cart>(&format!("SELECT {} FROM carts WHERE id = $1", CART_COLUMNS))
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(cart)
}

/// Find a cart by ID and lock it until the transaction ends
pub async fn find_by_id_for_update<'e, E>(executor: E, id: i32) -> Result<Option<Cart>, ApiError>
where
    E: PgExecutor<'e>,
{
    let cart = sqlx::query_as::<_, Cart>(&format!(
        "SELECT {} FROM carts WHERE id = $1 FOR UPDATE",
        CART_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(cart)
}

/// The customer's most recently updated active cart
pub async fn find_active_by_customer<'e, E>(executor: E, customer_id: i32) -> Result<Option<Cart>, ApiError>
where
    E: PgExecutor<'e>,
{
    let cart = sqlx::query_as::<_, Cart>(&format!(
        r#"
        SELECT {}
        FROM carts
        WHERE customer_id = $1 AND status = $2
        ORDER BY updated_at DESC, id DESC
        LIMIT 1
        "#,
        CART_COLUMNS
    ))
    .bind(customer_id)
    .bind(CartStatus::Active)
    .fetch_optional(executor)
    .await?;

    Ok(cart)
}

/// Lines of a cart in insertion order
pub async fn find_items<'e, E>(executor: E, cart_id: i32) -> Result<Vec<CartItem>, ApiError>
where
    E: PgExecutor<'e>,
{
    let items = sqlx::query_as::<_, CartItem>(&format!(
        "SELECT {} FROM cart_items WHERE cart_id = $1 ORDER BY id",
        CART_ITEM_COLUMNS
    ))
    .bind(cart_id)
    .fetch_all(executor)
    .await?;

    Ok(items)
}

/// Line for one product, if present
pub async fn find_item<'e, E>(executor: E, cart_id: i32, product_id: i32) -> Result<Option<CartItem>, ApiError>
where
    E: PgExecutor<'e>,
{
    let item = sqlx::query_as::<_, CartItem>(&format!(
        "SELECT {} FROM cart_items WHERE cart_id = $1 AND product_id = $2",
        CART_ITEM_COLUMNS
    ))
    .bind(cart_id)
    .bind(product_id)
    .fetch_optional(executor)
    .await?;

    Ok(item)
}

/// Insert a line or overwrite the existing line for the same product
pub async fn upsert_item<'e, E>(
    executor: E,
    cart_id: i32,
    product_id: i32,
    line: &LineSnapshot,
) -> Result<CartItem, ApiError>
where
    E: PgExecutor<'e>,
{
    let item = sqlx::query_as::<_, CartItem>(&format!(
        r#"
        INSERT INTO cart_items (
            cart_id, product_id, quantity, unit_price, subtotal, tax_percent, tax_amount, total
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (cart_id, product_id) DO UPDATE SET
            quantity = EXCLUDED.quantity,
            unit_price = EXCLUDED.unit_price,
            subtotal = EXCLUDED.subtotal,
            tax_percent = EXCLUDED.tax_percent,
            tax_amount = EXCLUDED.tax_amount,
            total = EXCLUDED.total,
            updated_at = NOW()
        RETURNING {}
        "#,
        CART_ITEM_COLUMNS
    ))
    .bind(cart_id)
    .bind(product_id)
    .bind(line.quantity)
    .bind(line.unit_price)
    .bind(line.subtotal)
    .bind(line.tax_percent)
    .bind(line.tax_amount)
    .bind(line.total)
    .fetch_one(executor)
    .await?;

    Ok(item)
}

/// Delete the line for one product; false when there was none
pub async fn remove_item<'e, E>(executor: E, cart_id: i32, product_id: i32) -> Result<bool, ApiError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
        .bind(cart_id)
        .bind(product_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Bump `updated_at`
pub async fn touch<'e, E>(executor: E, id: i32) -> Result<Cart, ApiError>
where
    E: PgExecutor<'e>,
{
    let cart = sqlx::query_as::<_, Cart>(&format!(
        "UPDATE carts SET updated_at = NOW() WHERE id = $1 RETURNING {}",
        CART_COLUMNS
    ))
    .bind(id)
    .fetch_one(executor)
    .await?;

    Ok(cart)
}

/// Update the cart status
pub async fn set_status<'e, E>(executor: E, id: i32, status: CartStatus) -> Result<Cart, ApiError>
where
    E: PgExecutor<'e>,
{
    let cart = sqlx::query_as::<_, Cart>(&format!(
        "UPDATE carts SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
        CART_COLUMNS
    ))
    .bind(id)
    .bind(status)
    .fetch_one(executor)
    .await?;

    Ok(cart)
}
