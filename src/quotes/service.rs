use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

use crate::carts;
use crate::catalog;
use crate::config::PricingSettings;
use crate::customers;
use crate::error::ApiError;
use crate::formatting::{format_code, temporary_code};
use crate::notifications::{self, NewNotification, NotificationKind};
use crate::pricing::{LineSnapshot, PriceCalculator};
use crate::quotes::{
    repository, ConversionResult, NewQuote, Quote, QuoteResponse, QuoteStatus, QuoteStatusMachine,
};
use crate::validation::MAX_LINE_QUANTITY;

const SOURCE_TABLE: &str = "quotes";

/// Service for quote business logic
///
/// Every write runs in a single transaction; an error anywhere drops the
/// transaction and nothing is persisted.
#[derive(Clone)]
pub struct QuoteService {
    pool: PgPool,
    settings: Arc<PricingSettings>,
}

impl QuoteService {
    pub fn new(pool: PgPool, settings: Arc<PricingSettings>) -> Self {
        Self { pool, settings }
    }

    /// Create a quote from either request channel
    ///
    /// # Validation
    /// - Repeated products are merged into one line
    /// - Every product must exist (all missing ids are reported together)
    /// - A referenced customer must exist
    ///
    /// Lookups and writes share one transaction: the quote, its CRM
    /// mirror, its lines and a `quote_created` notification commit together.
    pub async fn create_quote(&self, quote: NewQuote) -> Result<QuoteResponse, ApiError> {
        let requested = quote.merged_items();
        if let Some(item) = requested.iter().find(|i| i.quantity > MAX_LINE_QUANTITY) {
            return Err(ApiError::BadRequest(format!(
                "Quantity for product {} exceeds {}",
                item.product_id, MAX_LINE_QUANTITY
            )));
        }

        let mut tx = self.pool.begin().await?;

        let ids: Vec<i32> = requested.iter().map(|i| i.product_id).collect();
        let prices: HashMap<i32, Decimal> = catalog::repository::find_by_ids(&mut *tx, &ids)
            .await?
            .into_iter()
            .map(|product| (product.id, product.unit_price()))
            .collect();

        let mut missing = Vec::new();
        let mut lines: Vec<(i32, LineSnapshot)> = Vec::with_capacity(requested.len());
        for item in &requested {
            match prices.get(&item.product_id) {
                Some(unit_price) => lines.push((
                    item.product_id,
                    PriceCalculator::line(*unit_price, item.quantity, self.settings.tax_percent),
                )),
                None => missing.push(item.product_id),
            }
        }
        if !missing.is_empty() {
            return Err(ApiError::ProductsNotFound { ids: missing });
        }

        if let Some(customer_id) = quote.customer_id {
            if !customers::repository::exists(&mut *tx, customer_id).await? {
                return Err(ApiError::not_found("Customer", customer_id));
            }
        }

        let totals = PriceCalculator::totals(lines.iter().map(|(_, line)| line));

        let draft = repository::insert(&mut *tx, &quote, &totals, &temporary_code()).await?;
        let crm = repository::insert_crm_mirror(&mut *tx, &draft).await?;

        let code = format_code(
            &self.settings.quote_code_prefix,
            i64::from(draft.id),
            self.settings.code_width,
        );
        let saved = repository::finalize_code(&mut *tx, draft.id, &code, crm.id).await?;
        repository::finalize_crm_code(&mut *tx, crm.id, &code).await?;

        let mut items = Vec::with_capacity(lines.len());
        for (product_id, line) in &lines {
            items.push(repository::insert_item(&mut *tx, saved.id, *product_id, line).await?);
        }

        notifications::repository::create(&mut *tx, &created_notification(&saved, items.len())).await?;

        tx.commit().await?;

        tracing::info!(
            "Created quote {} ({:?}) with {} items, total {}",
            saved.code,
            saved.channel,
            items.len(),
            saved.total
        );
        Ok(QuoteResponse::new(saved, items))
    }

    /// Fetch a quote with its lines
    pub async fn get_quote(&self, quote_id: i32) -> Result<QuoteResponse, ApiError> {
        let quote = repository::find_by_id(&self.pool, quote_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Quote", quote_id))?;
        let items = repository::find_items(&self.pool, quote.id).await?;

        Ok(QuoteResponse::new(quote, items))
    }

    /// Copy a quote's lines into a cart and move the quote under review
    ///
    /// A quote with a customer reuses that customer's most recently updated
    /// active cart. Lines are keyed by product and overwritten with the
    /// quote snapshot, so converting twice leaves the cart unchanged.
    pub async fn convert_to_cart(&self, quote_id: i32) -> Result<ConversionResult, ApiError> {
        let mut tx = self.pool.begin().await?;

        let quote = repository::find_by_id_for_update(&mut *tx, quote_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Quote", quote_id))?;
        let items = repository::find_items(&mut *tx, quote.id).await?;

        let next = transition(quote.status, QuoteStatus::UnderReview)?;

        let existing = match quote.customer_id {
            Some(customer_id) => carts::repository::find_active_by_customer(&mut *tx, customer_id).await?,
            None => None,
        };
        let cart = match existing {
            Some(cart) => cart,
            None => carts::repository::create(&mut *tx, quote.customer_id).await?,
        };

        for item in &items {
            carts::repository::upsert_item(&mut *tx, cart.id, item.product_id, &item.snapshot()).await?;
        }
        carts::repository::touch(&mut *tx, cart.id).await?;

        repository::update_status(&mut *tx, quote.id, next).await?;
        repository::update_crm_status(&mut *tx, quote.id, next).await?;

        notifications::repository::create(&mut *tx, &converted_notification(&quote, cart.id, items.len()))
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Converted quote {} into cart {} ({} items)",
            quote.code,
            cart.id,
            items.len()
        );
        Ok(ConversionResult {
            cart_id: cart.id,
            quote_id: quote.id,
        })
    }

    /// Move a quote to a new status and mirror it onto the CRM row
    pub async fn update_status(&self, quote_id: i32, status: QuoteStatus) -> Result<QuoteResponse, ApiError> {
        let mut tx = self.pool.begin().await?;

        let quote = repository::find_by_id_for_update(&mut *tx, quote_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Quote", quote_id))?;

        let next = transition(quote.status, status)?;
        let previous = quote.status;

        let updated = repository::update_status(&mut *tx, quote.id, next).await?;
        repository::update_crm_status(&mut *tx, quote.id, next).await?;

        if previous != next {
            notifications::repository::create(&mut *tx, &status_notification(&updated, previous)).await?;
        }

        let items = repository::find_items(&mut *tx, quote.id).await?;

        tx.commit().await?;

        tracing::info!("Quote {} status {} -> {}", updated.code, previous, next);
        Ok(QuoteResponse::new(updated, items))
    }
}

fn transition(from: QuoteStatus, to: QuoteStatus) -> Result<QuoteStatus, ApiError> {
    QuoteStatusMachine::transition(from, to).map_err(|_| ApiError::InvalidTransition {
        from: from.to_string(),
        to: to.to_string(),
    })
}

fn created_notification(quote: &Quote, item_count: usize) -> NewNotification {
    NewNotification {
        kind: NotificationKind::QuoteCreated,
        source_table: SOURCE_TABLE,
        source_id: quote.id,
        title: format!("New quote {}", quote.code),
        detail: format!(
            "{} <{}> requested {} item(s), total {}",
            quote.contact_name, quote.contact_email, item_count, quote.total
        ),
    }
}

fn converted_notification(quote: &Quote, cart_id: i32, item_count: usize) -> NewNotification {
    NewNotification {
        kind: NotificationKind::QuoteConverted,
        source_table: SOURCE_TABLE,
        source_id: quote.id,
        title: format!("Quote {} converted to cart", quote.code),
        detail: format!("{} item(s) copied into cart {}", item_count, cart_id),
    }
}

fn status_notification(quote: &Quote, previous: QuoteStatus) -> NewNotification {
    NewNotification {
        kind: NotificationKind::QuoteStatusChanged,
        source_table: SOURCE_TABLE,
        source_id: quote.id,
        title: format!("Quote {} is now {}", quote.code, quote.status),
        detail: format!("Status changed from {} to {}", previous, quote.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::QuoteChannel;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn quote(status: QuoteStatus) -> Quote {
        Quote {
            id: 42,
            code: "COT-000042".into(),
            channel: QuoteChannel::WebForm,
            customer_id: None,
            crm_quote_id: Some(40),
            contact_name: "Ana Pérez".into(),
            contact_email: "ana@example.cl".into(),
            contact_phone: None,
            contact_company: None,
            contact_tax_id: None,
            observations: None,
            subtotal: dec!(2000),
            tax_total: dec!(380),
            total: dec!(2380),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_created_notification_mentions_code_contact_and_total() {
        let n = created_notification(&quote(QuoteStatus::Pending), 2);
        assert_eq!(n.kind, NotificationKind::QuoteCreated);
        assert_eq!(n.source_table, "quotes");
        assert_eq!(n.source_id, 42);
        assert!(n.title.contains("COT-000042"));
        assert!(n.detail.contains("Ana Pérez"));
        assert!(n.detail.contains("ana@example.cl"));
        assert!(n.detail.contains("2 item(s)"));
        assert!(n.detail.contains("2380"));
    }

    #[test]
    fn test_converted_notification_cites_cart() {
        let n = converted_notification(&quote(QuoteStatus::Pending), 9, 3);
        assert_eq!(n.kind, NotificationKind::QuoteConverted);
        assert!(n.detail.contains("cart 9"));
        assert!(n.detail.contains("3 item(s)"));
    }

    #[test]
    fn test_status_notification_names_both_statuses() {
        let n = status_notification(&quote(QuoteStatus::Accepted), QuoteStatus::UnderReview);
        assert_eq!(n.kind, NotificationKind::QuoteStatusChanged);
        assert!(n.detail.contains("under_review"));
        assert!(n.detail.contains("accepted"));
    }

    #[test]
    fn test_transition_maps_to_invalid_transition_error() {
        let err = transition(QuoteStatus::Rejected, QuoteStatus::UnderReview).unwrap_err();
        match err {
            ApiError::InvalidTransition { from, to } => {
                assert_eq!(from, "rejected");
                assert_eq!(to, "under_review");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_conversion_allowed_from_open_statuses() {
        assert_eq!(
            transition(QuoteStatus::Pending, QuoteStatus::UnderReview).unwrap(),
            QuoteStatus::UnderReview
        );
        assert_eq!(
            transition(QuoteStatus::UnderReview, QuoteStatus::UnderReview).unwrap(),
            QuoteStatus::UnderReview
        );
    }
}
