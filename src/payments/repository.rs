use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error::ApiError;
use crate::payments::{Payment, PaymentStatus};

const PAYMENT_COLUMNS: &str = "id, order_id, amount, status, external_reference, created_at";

/// Most recent pending preference for an order
pub async fn find_pending_by_order<'e, E>(executor: E, order_id: i32) -> Result<Option<Payment>, ApiError>
where
    E: PgExecutor<'e>,
{
    let payment = sqlx::query_as::<_, Payment>(&format!(
        r#"
        SELECT {}
        FROM payments
        WHERE order_id = $1 AND status = $2
        ORDER BY created_at DESC
        LIMIT 1
        "#,
        PAYMENT_COLUMNS
    ))
    .bind(order_id)
    .bind(PaymentStatus::Pending)
    .fetch_optional(executor)
    .await?;

    Ok(payment)
}

/// Insert a pending preference
pub async fn create<'e, E>(
    executor: E,
    order_id: i32,
    amount: Decimal,
    external_reference: &str,
) -> Result<Payment, ApiError>
where
    E: PgExecutor<'e>,
{
    let payment = sqlx::query_as::<_, Payment>(&format!(
        r#"
        INSERT INTO payments (id, order_id, amount, status, external_reference)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        PAYMENT_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(amount)
    .bind(PaymentStatus::Pending)
    .bind(external_reference)
    .fetch_one(executor)
    .await?;

    Ok(payment)
}
