use sqlx::PgPool;

use crate::error::ApiError;
use crate::notifications::{self, NewNotification, NotificationKind};
use crate::orders::{self, Order, OrderStatus};
use crate::payments::{repository, Payment, PreferenceOutcome};

/// Prepares payment preferences for pending orders
///
/// Only the local record is written; talking to a payment gateway is left
/// to whoever consumes the `payment_preference_created` notification.
#[derive(Clone)]
pub struct PaymentService {
    pool: PgPool,
}

impl PaymentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the order's pending preference, creating it if needed
    pub async fn create_preference(&self, order_id: i32) -> Result<PreferenceOutcome, ApiError> {
        let mut tx = self.pool.begin().await?;

        let order = orders::repository::find_by_id_for_update(&mut *tx, order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", order_id))?;

        if order.status != OrderStatus::Pending {
            return Err(ApiError::Conflict {
                message: format!(
                    "Order {} is {}; payment preferences need a pending order",
                    order.code, order.status
                ),
            });
        }

        if let Some(payment) = repository::find_pending_by_order(&mut *tx, order.id).await? {
            tracing::debug!("Reusing payment preference {} for order {}", payment.id, order.code);
            return Ok(PreferenceOutcome {
                payment,
                created: false,
            });
        }

        let payment = repository::create(&mut *tx, order.id, order.total, &order.code).await?;
        notifications::repository::create(&mut *tx, &created_notification(&order, &payment)).await?;

        tx.commit().await?;

        tracing::info!(
            "Created payment preference {} for order {} ({})",
            payment.id,
            order.code,
            payment.amount
        );
        Ok(PreferenceOutcome {
            payment,
            created: true,
        })
    }
}

fn created_notification(order: &Order, payment: &Payment) -> NewNotification {
    NewNotification {
        kind: NotificationKind::PaymentPreferenceCreated,
        source_table: "orders",
        source_id: order.id,
        title: format!("Payment preference for {}", order.code),
        detail: format!("Pending payment {} for {}", payment.id, payment.amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::PaymentStatus;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_created_notification_points_at_order() {
        let order = Order {
            id: 5,
            code: "ORD-000005".into(),
            cart_id: 2,
            customer_id: Some(1),
            status: OrderStatus::Pending,
            subtotal: dec!(2000),
            tax_total: dec!(380),
            total: dec!(2380),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let payment = Payment {
            id: Uuid::new_v4(),
            order_id: 5,
            amount: dec!(2380),
            status: PaymentStatus::Pending,
            external_reference: "ORD-000005".into(),
            created_at: Utc::now(),
        };

        let n = created_notification(&order, &payment);
        assert_eq!(n.kind, NotificationKind::PaymentPreferenceCreated);
        assert_eq!(n.source_table, "orders");
        assert_eq!(n.source_id, 5);
        assert!(n.title.contains("ORD-000005"));
        assert!(n.detail.contains("2380"));
    }
}
