use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::pricing::PriceCalculator;

/// Product row in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "DRL-200")]
    pub sku: String,
    #[schema(example = "Cordless drill 20V")]
    pub name: String,
    #[schema(example = 1000)]
    pub general_price: Decimal,
    /// Used instead of the general price when positive
    pub discount_price: Option<Decimal>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Price a buyer pays per unit right now
    pub fn unit_price(&self) -> Decimal {
        PriceCalculator::unit_price(self.general_price, self.discount_price)
    }
}

/// Catalog entry returned by the listing endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i32,
    pub sku: String,
    pub name: String,
    pub general_price: Decimal,
    pub discount_price: Option<Decimal>,
    /// Effective unit price
    pub price: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            price: product.unit_price(),
            id: product.id,
            sku: product.sku,
            name: product.name,
            general_price: product.general_price,
            discount_price: product.discount_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(discount: Option<Decimal>) -> Product {
        Product {
            id: 1,
            sku: "DRL-200".into(),
            name: "Cordless drill".into(),
            general_price: dec!(1000),
            discount_price: discount,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_response_uses_effective_price() {
        assert_eq!(ProductResponse::from(product(Some(dec!(0)))).price, dec!(1000));
        assert_eq!(ProductResponse::from(product(Some(dec!(900)))).price, dec!(900));
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let json = serde_json::to_value(ProductResponse::from(product(None))).unwrap();
        assert!(json.get("generalPrice").is_some());
        assert!(json.get("discountPrice").is_some());
        assert_eq!(json["sku"], "DRL-200");
    }
}
