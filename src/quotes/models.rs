use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::formatting::{
    build_observations, normalize_email, normalize_name, normalize_phone, normalize_tax_id,
    normalize_text, ObservationFields,
};
use crate::pricing::LineSnapshot;

/// Quote status enum representing the lifecycle of a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    UnderReview,
    Accepted,
    Rejected,
}

impl QuoteStatus {
    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::UnderReview => "under_review",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
        }
    }
}

impl Default for QuoteStatus {
    fn default() -> Self {
        QuoteStatus::Pending
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a quote was submitted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuoteChannel {
    Ecommerce,
    WebForm,
}

/// Ecommerce-facing quote row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: i32,
    pub code: String,
    pub channel: QuoteChannel,
    pub customer_id: Option<i32>,
    pub crm_quote_id: Option<i32>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub contact_company: Option<String>,
    pub contact_tax_id: Option<String>,
    pub observations: Option<String>,
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line of a quote, frozen at creation time
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuoteItem {
    pub id: i32,
    pub quote_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

impl QuoteItem {
    /// Frozen price/tax values of this line
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

/// CRM-facing mirror of a quote
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CrmQuote {
    pub id: i32,
    pub quote_id: i32,
    pub code: String,
    pub channel: QuoteChannel,
    pub customer_id: Option<i32>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub company: Option<String>,
    pub tax_id: Option<String>,
    pub observations: Option<String>,
    pub total: Decimal,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Line requested through the public web form (`POST /cotizaciones`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WebQuoteItem {
    #[serde(rename = "productoId")]
    pub product_id: i32,
    #[serde(rename = "cantidad")]
    #[validate(range(min = 1, max = 10000, message = "Quantity must be between 1 and 10000"))]
    pub quantity: i32,
}

/// Quote request sent by the public web form, Spanish keys
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WebQuoteRequest {
    #[serde(rename = "nombre")]
    #[validate(
        length(min = 2, max = 160, message = "Name must be between 2 and 160 characters"),
        custom = "crate::validation::validate_not_blank"
    )]
    pub name: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[serde(rename = "telefono", default)]
    #[validate(length(max = 32, message = "Phone must not exceed 32 characters"))]
    pub phone: Option<String>,
    #[serde(rename = "empresa", default)]
    #[validate(length(max = 160, message = "Company must not exceed 160 characters"))]
    pub company: Option<String>,
    #[serde(rename = "rut", default)]
    #[validate(custom = "crate::validation::validate_tax_id")]
    pub tax_id: Option<String>,
    #[serde(rename = "clienteId", default)]
    pub customer_id: Option<i32>,
    #[serde(rename = "notas", default)]
    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub notes: Option<String>,
    #[serde(rename = "tipoProyecto", default)]
    #[validate(length(max = 120))]
    pub project_type: Option<String>,
    #[serde(default)]
    #[validate(length(max = 120))]
    pub region: Option<String>,
    #[serde(rename = "comuna", default)]
    #[validate(length(max = 120))]
    pub location: Option<String>,
    #[serde(rename = "detalle", default)]
    #[validate(length(max = 2000))]
    pub details: Option<String>,
    #[serde(rename = "productos")]
    #[validate(
        length(min = 1, max = 100, message = "A quote must contain between 1 and 100 items"),
        custom = "crate::validation::validate_items"
    )]
    pub items: Vec<WebQuoteItem>,
}

/// Contact block of the ecommerce quote request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteContactRequest {
    #[validate(
        length(min = 2, max = 160, message = "Name must be between 2 and 160 characters"),
        custom = "crate::validation::validate_not_blank"
    )]
    pub name: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(max = 32, message = "Phone must not exceed 32 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 160, message = "Company must not exceed 160 characters"))]
    pub company: Option<String>,
    #[validate(custom = "crate::validation::validate_tax_id")]
    pub tax_id: Option<String>,
}

/// Line requested through the storefront
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItemRequest {
    pub product_id: i32,
    #[validate(range(min = 1, max = 10000, message = "Quantity must be between 1 and 10000"))]
    pub quantity: i32,
}

/// Quote request sent by the storefront (`POST /ecommerce/quotes`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    pub customer_id: Option<i32>,
    #[validate]
    pub contact: QuoteContactRequest,
    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub notes: Option<String>,
    #[validate(
        length(min = 1, max = 100, message = "A quote must contain between 1 and 100 items"),
        custom = "crate::validation::validate_items"
    )]
    pub items: Vec<QuoteItemRequest>,
}

/// Request DTO for updating quote status
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
}

// ---------------------------------------------------------------------------
// Service input
// ---------------------------------------------------------------------------

/// Normalized contact snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub tax_id: Option<String>,
}

impl QuoteContact {
    fn normalized(
        name: &str,
        email: &str,
        phone: Option<&str>,
        company: Option<&str>,
        tax_id: Option<&str>,
    ) -> Self {
        Self {
            name: normalize_name(name),
            email: normalize_email(email),
            phone: normalize_phone(phone),
            company: normalize_text(company),
            tax_id: normalize_tax_id(tax_id),
        }
    }
}

/// One requested product and quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedItem {
    pub product_id: i32,
    pub quantity: i32,
}

/// Channel-independent quote creation input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    pub channel: QuoteChannel,
    pub customer_id: Option<i32>,
    pub contact: QuoteContact,
    pub observations: Option<String>,
    pub items: Vec<RequestedItem>,
}

impl NewQuote {
    /// Items with repeated products merged (quantities summed), first-seen order
    pub fn merged_items(&self) -> Vec<RequestedItem> {
        let mut merged: Vec<RequestedItem> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match merged.iter_mut().find(|m| m.product_id == item.product_id) {
                Some(existing) => existing.quantity += item.quantity,
                None => merged.push(*item),
            }
        }
        merged
    }
}

impl From<WebQuoteRequest> for NewQuote {
    fn from(request: WebQuoteRequest) -> Self {
        let observations = build_observations(&ObservationFields {
            notes: request.notes.as_deref(),
            project_type: request.project_type.as_deref(),
            region: request.region.as_deref(),
            location: request.location.as_deref(),
            details: request.details.as_deref(),
        });

        Self {
            channel: QuoteChannel::WebForm,
            customer_id: request.customer_id,
            contact: QuoteContact::normalized(
                &request.name,
                &request.email,
                request.phone.as_deref(),
                request.company.as_deref(),
                request.tax_id.as_deref(),
            ),
            observations,
            items: request
                .items
                .iter()
                .map(|item| RequestedItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

impl From<CreateQuoteRequest> for NewQuote {
    fn from(request: CreateQuoteRequest) -> Self {
        let observations = build_observations(&ObservationFields {
            notes: request.notes.as_deref(),
            ..Default::default()
        });

        Self {
            channel: QuoteChannel::Ecommerce,
            customer_id: request.customer_id,
            contact: QuoteContact::normalized(
                &request.contact.name,
                &request.contact.email,
                request.contact.phone.as_deref(),
                request.contact.company.as_deref(),
                request.contact.tax_id.as_deref(),
            ),
            observations,
            items: request
                .items
                .iter()
                .map(|item| RequestedItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response DTO for a quote line
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItemResponse {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

impl From<QuoteItem> for QuoteItemResponse {
    fn from(item: QuoteItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: item.subtotal,
            tax_percent: item.tax_percent,
            tax_amount: item.tax_amount,
            total: item.total,
        }
    }
}

/// Contact snapshot as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteContactResponse {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub tax_id: Option<String>,
}

/// Response DTO for a quote with items
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub id: i32,
    #[schema(example = "COT-000042")]
    pub code: String,
    pub channel: QuoteChannel,
    pub status: QuoteStatus,
    pub customer_id: Option<i32>,
    pub crm_quote_id: Option<i32>,
    pub contact: QuoteContactResponse,
    pub observations: Option<String>,
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
    pub items: Vec<QuoteItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuoteResponse {
    pub fn new(quote: Quote, items: Vec<QuoteItem>) -> Self {
        Self {
            id: quote.id,
            code: quote.code,
            channel: quote.channel,
            status: quote.status,
            customer_id: quote.customer_id,
            crm_quote_id: quote.crm_quote_id,
            contact: QuoteContactResponse {
                name: quote.contact_name,
                email: quote.contact_email,
                phone: quote.contact_phone,
                company: quote.contact_company,
                tax_id: quote.contact_tax_id,
            },
            observations: quote.observations,
            subtotal: quote.subtotal,
            tax_total: quote.tax_total,
            total: quote.total,
            items: items.into_iter().map(QuoteItemResponse::from).collect(),
            created_at: quote.created_at,
            updated_at: quote.updated_at,
        }
    }
}

/// Result of converting a quote into a cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub cart_id: i32,
    pub quote_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn web_payload() -> serde_json::Value {
        json!({
            "nombre": "  juan  soto ",
            "email": "Juan.Soto@Example.CL",
            "telefono": "+56 9 1111 2222",
            "empresa": "Constructora Andes",
            "rut": "11.111.111-1",
            "notas": "Needs delivery",
            "tipoProyecto": "Remodel",
            "region": "Valparaíso",
            "comuna": "Viña del Mar",
            "productos": [
                { "productoId": 1, "cantidad": 2 },
                { "productoId": 5, "cantidad": 1 }
            ]
        })
    }

    fn ecommerce_payload() -> serde_json::Value {
        json!({
            "customerId": 9,
            "contact": {
                "name": "Juan Soto",
                "email": "juan.soto@example.cl",
                "phone": "+56911112222",
                "company": "Constructora Andes",
                "taxId": "11111111-1"
            },
            "notes": "Needs delivery",
            "items": [
                { "productId": 1, "quantity": 2 },
                { "productId": 5, "quantity": 1 }
            ]
        })
    }

    #[test]
    fn test_web_request_deserializes_and_validates() {
        let request: WebQuoteRequest = serde_json::from_value(web_payload()).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(request.customer_id, None);
    }

    #[test]
    fn test_ecommerce_request_deserializes_and_validates() {
        let request: CreateQuoteRequest = serde_json::from_value(ecommerce_payload()).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.customer_id, Some(9));
        assert_eq!(request.contact.tax_id.as_deref(), Some("11111111-1"));
    }

    #[test]
    fn test_both_shapes_map_to_same_contact_and_items() {
        let web: NewQuote = serde_json::from_value::<WebQuoteRequest>(web_payload()).unwrap().into();
        let shop: NewQuote = serde_json::from_value::<CreateQuoteRequest>(ecommerce_payload())
            .unwrap()
            .into();

        assert_eq!(web.channel, QuoteChannel::WebForm);
        assert_eq!(shop.channel, QuoteChannel::Ecommerce);
        assert_eq!(web.contact, shop.contact);
        assert_eq!(web.items, shop.items);
        assert_eq!(web.contact.email, "juan.soto@example.cl");
        assert_eq!(web.contact.name, "Juan Soto");
        assert_eq!(web.contact.tax_id.as_deref(), Some("11111111-1"));
    }

    #[test]
    fn test_web_observations_include_all_non_empty_fields() {
        let web: NewQuote = serde_json::from_value::<WebQuoteRequest>(web_payload()).unwrap().into();
        assert_eq!(
            web.observations.as_deref(),
            Some("Notes: Needs delivery\nProject type: Remodel\nRegion: Valparaíso\nLocation: Viña del Mar")
        );
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut payload = ecommerce_payload();
        payload["items"] = json!([]);
        let request: CreateQuoteRequest = serde_json::from_value(payload).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut payload = web_payload();
        payload["productos"] = json!([{ "productoId": 1, "cantidad": 0 }]);
        let request: WebQuoteRequest = serde_json::from_value(payload).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_invalid_nested_contact_rejected() {
        let mut payload = ecommerce_payload();
        payload["contact"]["email"] = json!("nope");
        let request: CreateQuoteRequest = serde_json::from_value(payload).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_merged_items_sums_duplicates_in_order() {
        let quote = NewQuote {
            channel: QuoteChannel::Ecommerce,
            customer_id: None,
            contact: QuoteContact::normalized("a b", "a@b.cl", None, None, None),
            observations: None,
            items: vec![
                RequestedItem { product_id: 3, quantity: 1 },
                RequestedItem { product_id: 1, quantity: 2 },
                RequestedItem { product_id: 3, quantity: 4 },
            ],
        };
        assert_eq!(
            quote.merged_items(),
            vec![
                RequestedItem { product_id: 3, quantity: 5 },
                RequestedItem { product_id: 1, quantity: 2 },
            ]
        );
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_value(QuoteStatus::UnderReview).unwrap(), json!("under_review"));
        let parsed: UpdateQuoteStatusRequest = serde_json::from_value(json!({ "status": "accepted" })).unwrap();
        assert_eq!(parsed.status, QuoteStatus::Accepted);
    }

    #[test]
    fn test_conversion_result_shape() {
        let value = serde_json::to_value(ConversionResult { cart_id: 4, quote_id: 11 }).unwrap();
        assert_eq!(value, json!({ "cartId": 4, "quoteId": 11 }));
    }
}
