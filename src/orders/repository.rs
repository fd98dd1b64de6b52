use sqlx::PgExecutor;

use crate::error::ApiError;
use crate::orders::{Order, OrderItem, OrderStatus};
use crate::pricing::{LineSnapshot, Totals};

const ORDER_COLUMNS: &str =
    "id, code, cart_id, customer_id, status, subtotal, tax_total, total, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, quantity, unit_price, subtotal, tax_percent, tax_amount, total";

/// Take the next id from the orders sequence so the code can be built before insert
pub async fn reserve_id<'e, E>(executor: E) -> Result<i32, ApiError>
where
    E: PgExecutor<'e>,
{
    let next: i64 = sqlx::query_scalar("SELECT nextval(pg_get_serial_sequence('orders', 'id'))")
        .fetch_one(executor)
        .await?;

    i32::try_from(next).map_err(|_| ApiError::InternalError(format!("Order id {} out of range", next)))
}

/// Insert an order header with a pre-reserved id
pub async fn insert<'e, E>(
    executor: E,
    id: i32,
    code: &str,
    cart_id: i32,
    customer_id: Option<i32>,
    totals: &Totals,
) -> Result<Order, ApiError>
where
    E: PgExecutor<'e>,
{
    let order = sqlx::query_as::<_, Order>(&format!(
        r#"
        INSERT INTO orders (id, code, cart_id, customer_id, status, subtotal, tax_total, total)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        ORDER_COLUMNS
    ))
    .bind(id)
    .bind(code)
    .bind(cart_id)
    .bind(customer_id)
    .bind(OrderStatus::Pending)
    .bind(totals.subtotal)
    .bind(totals.tax_total)
    .bind(totals.total)
    .fetch_one(executor)
    .await?;

    Ok(order)
}

/// Insert one order line
pub async fn insert_item<'e, E>(
    executor: E,
    order_id: i32,
    product_id: i32,
    line: &LineSnapshot,
) -> Result<OrderItem, ApiError>
where
    E: PgExecutor<'e>,
{
    let item = sqlx::query_as::<_, OrderItem>(&format!(
        r#"
        INSERT INTO order_items (
            order_id, product_id, quantity, unit_price, subtotal, tax_percent, tax_amount, total
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        ORDER_ITEM_COLUMNS
    ))
    .bind(order_id)
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

/// Find an order by ID
pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Order>, ApiError>
where
    E: PgExecutor<'e>,
{
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(order)
}

/// Find an order by ID and lock it until the transaction ends
pub async fn find_by_id_for_update<'e, E>(executor: E, id: i32) -> Result<Option<Order>, ApiError>
where
    E: PgExecutor<'e>,
{
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {} FROM orders WHERE id = $1 FOR UPDATE",
        ORDER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(order)
}

/// Lines of an order in insertion order
pub async fn find_items<'e, E>(executor: E, order_id: i32) -> Result<Vec<OrderItem>, ApiError>
where
    E: PgExecutor<'e>,
{
    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {} FROM order_items WHERE order_id = $1 ORDER BY id",
        ORDER_ITEM_COLUMNS
    ))
    .bind(order_id)
    .fetch_all(executor)
    .await?;

    Ok(items)
}

/// Update order status and bump `updated_at`
pub async fn update_status<'e, E>(executor: E, id: i32, status: OrderStatus) -> Result<Order, ApiError>
where
    E: PgExecutor<'e>,
{
    let order = sqlx::query_as::<_, Order>(&format!(
        "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
        ORDER_COLUMNS
    ))
    .bind(id)
    .bind(status)
    .fetch_one(executor)
    .await?;

    Ok(order)
}
