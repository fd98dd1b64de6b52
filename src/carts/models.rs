use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::pricing::{LineSnapshot, PriceCalculator, Totals};

/// Cart status; only active carts accept changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    Active,
    CheckedOut,
}

impl CartStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartStatus::Active => "active",
            CartStatus::CheckedOut => "checked_out",
        }
    }
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cart row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cart {
    pub id: i32,
    pub customer_id: Option<i32>,
    pub status: CartStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart line, one per product
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    pub fn snapshot(&self) -> LineSnapshot {
        LineSnapshot {
            quantity: self.quantity,
            unit_price: self.unit_price,
            subtotal: self.subtotal,
            tax_percent: self.tax_percent,
            tax_amount: self.tax_amount,
            total: self.total,
        }
    }
}

/// Request DTO for POST /ecommerce/carts/:id/items
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub product_id: i32,
    #[validate(range(min = 1, max = 10000, message = "Quantity must be between 1 and 10000"))]
    pub quantity: i32,
}

/// Response DTO for a cart line
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: item.subtotal,
            tax_percent: item.tax_percent,
            tax_amount: item.tax_amount,
            total: item.total,
            updated_at: item.updated_at,
        }
    }
}

/// Response DTO for a cart with items and computed totals
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub id: i32,
    pub customer_id: Option<i32>,
    pub status: CartStatus,
    pub items: Vec<CartItemResponse>,
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartResponse {
    pub fn new(cart: Cart, items: Vec<CartItem>) -> Self {
        let snapshots: Vec<LineSnapshot> = items.iter().map(CartItem::snapshot).collect();
        let Totals {
            subtotal,
            tax_total,
            total,
        } = PriceCalculator::totals(&snapshots);

        Self {
            id: cart.id,
            customer_id: cart.customer_id,
            status: cart.status,
            items: items.into_iter().map(CartItemResponse::from).collect(),
            subtotal,
            tax_total,
            total,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(product_id: i32, quantity: i32, unit: Decimal) -> CartItem {
        let line = PriceCalculator::line(unit, quantity, dec!(19));
        CartItem {
            id: product_id,
            cart_id: 1,
            product_id,
            quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal,
            tax_percent: line.tax_percent,
            tax_amount: line.tax_amount,
            total: line.total,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn cart() -> Cart {
        Cart {
            id: 1,
            customer_id: Some(3),
            status: CartStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_response_totals_sum_lines() {
        let response = CartResponse::new(cart(), vec![item(1, 2, dec!(1000)), item(2, 1, dec!(105))]);
        assert_eq!(response.subtotal, dec!(2105));
        assert_eq!(response.tax_total, dec!(400));
        assert_eq!(response.total, dec!(2505));
        assert_eq!(response.items.len(), 2);
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let response = CartResponse::new(cart(), vec![]);
        assert_eq!(response.total, Decimal::ZERO);
    }

    #[test]
    fn test_add_item_request_validation() {
        let ok: AddCartItemRequest =
            serde_json::from_value(serde_json::json!({ "productId": 1, "quantity": 3 })).unwrap();
        assert!(ok.validate().is_ok());

        let bad: AddCartItemRequest =
            serde_json::from_value(serde_json::json!({ "productId": 1, "quantity": 0 })).unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(CartStatus::CheckedOut).unwrap(),
            serde_json::json!("checked_out")
        );
    }
}
