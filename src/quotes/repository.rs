use sqlx::PgExecutor;

use crate::error::ApiError;
use crate::pricing::{LineSnapshot, Totals};
use crate::quotes::{CrmQuote, NewQuote, Quote, QuoteItem, QuoteStatus};

const QUOTE_COLUMNS: &str = "id, code, channel, customer_id, crm_quote_id, contact_name, contact_email, \
     contact_phone, contact_company, contact_tax_id, observations, subtotal, tax_total, total, status, \
     created_at, updated_at";

const QUOTE_ITEM_COLUMNS: &str =
    "id, quote_id, product_id, quantity, unit_price, subtotal, tax_percent, tax_amount, total";

const CRM_QUOTE_COLUMNS: &str = "id, quote_id, code, channel, customer_id, contact_name, contact_email, \
     contact_phone, company, tax_id, observations, total, status, created_at, updated_at";

/// Insert the quote header under a provisional code
pub async fn insert<'e, E>(
    executor: E,
    quote: &NewQuote,
    totals: &Totals,
    code: &str,
) -> Result<Quote, ApiError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, Quote>(&format!(
        r#"
        INSERT INTO quotes (
            code, channel, customer_id, contact_name, contact_email, contact_phone,
            contact_company, contact_tax_id, observations, subtotal, tax_total, total, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {}
        "#,
        QUOTE_COLUMNS
    ))
    .bind(code)
    .bind(quote.channel)
    .bind(quote.customer_id)
    .bind(&quote.contact.name)
    .bind(&quote.contact.email)
    .bind(&quote.contact.phone)
    .bind(&quote.contact.company)
    .bind(&quote.contact.tax_id)
    .bind(&quote.observations)
    .bind(totals.subtotal)
    .bind(totals.tax_total)
    .bind(totals.total)
    .bind(QuoteStatus::Pending)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

/// Insert the CRM mirror of a freshly inserted quote
pub async fn insert_crm_mirror<'e, E>(executor: E, quote: &Quote) -> Result<CrmQuote, ApiError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, CrmQuote>(&format!(
        r#"
        INSERT INTO crm_quotes (
            quote_id, code, channel, customer_id, contact_name, contact_email, contact_phone,
            company, tax_id, observations, total, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {}
        "#,
        CRM_QUOTE_COLUMNS
    ))
    .bind(quote.id)
    .bind(&quote.code)
    .bind(quote.channel)
    .bind(quote.customer_id)
    .bind(&quote.contact_name)
    .bind(&quote.contact_email)
    .bind(&quote.contact_phone)
    .bind(&quote.contact_company)
    .bind(&quote.contact_tax_id)
    .bind(&quote.observations)
    .bind(quote.total)
    .bind(quote.status)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

/// Replace the provisional code and link the CRM mirror
pub async fn finalize_code<'e, E>(
    executor: E,
    quote_id: i32,
    code: &str,
    crm_quote_id: i32,
) -> Result<Quote, ApiError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, Quote>(&format!(
        "UPDATE quotes SET code = $2, crm_quote_id = $3, updated_at = NOW() WHERE id = $1 RETURNING {}",
        QUOTE_COLUMNS
    ))
    .bind(quote_id)
    .bind(code)
    .bind(crm_quote_id)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

/// Copy the final code onto the CRM mirror
pub async fn finalize_crm_code<'e, E>(executor: E, crm_quote_id: i32, code: &str) -> Result<(), ApiError>
where
    E: PgExecutor<'e>,
{
    sqlx::query("UPDATE crm_quotes SET code = $2, updated_at = NOW() WHERE id = $1")
        .bind(crm_quote_id)
        .bind(code)
        .execute(executor)
        .await?;

    Ok(())
}

/// Insert one priced line
pub async fn insert_item<'e, E>(
    executor: E,
    quote_id: i32,
    product_id: i32,
    line: &LineSnapshot,
) -> Result<QuoteItem, ApiError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, QuoteItem>(&format!(
        r#"
        INSERT INTO quote_items (
            quote_id, product_id, quantity, unit_price, subtotal, tax_percent, tax_amount, total
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        QUOTE_ITEM_COLUMNS
    ))
    .bind(quote_id)
    .bind(product_id)
    .bind(line.quantity)
    .bind(line.unit_price)
    .bind(line.subtotal)
    .bind(line.tax_percent)
    .bind(line.tax_amount)
    .bind(line.total)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

/// Find a quote by ID
pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Quote>, ApiError>
where
    E: PgExecutor<'e>,
{
    let quote = sqlx::query_as::<_, Quote>(&format!("SELECT {} FROM quotes WHERE id = $1", QUOTE_COLUMNS))
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(quote)
}

/// Find a quote by ID and lock the row until the transaction ends
pub async fn find_by_id_for_update<'e, E>(executor: E, id: i32) -> Result<Option<Quote>, ApiError>
where
    E: PgExecutor<'e>,
{
    let quote = sqlx::query_as::<_, Quote>(&format!(
        "SELECT {} FROM quotes WHERE id = $1 FOR UPDATE",
        QUOTE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(quote)
}

/// Lines of a quote in insertion order
pub async fn find_items<'e, E>(executor: E, quote_id: i32) -> Result<Vec<QuoteItem>, ApiError>
where
    E: PgExecutor<'e>,
{
    let items = sqlx::query_as::<_, QuoteItem>(&format!(
        "SELECT {} FROM quote_items WHERE quote_id = $1 ORDER BY id",
        QUOTE_ITEM_COLUMNS
    ))
    .bind(quote_id)
    .fetch_all(executor)
    .await?;

    Ok(items)
}

/// CRM mirror of a quote
pub async fn find_crm_mirror<'e, E>(executor: E, quote_id: i32) -> Result<Option<CrmQuote>, ApiError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, CrmQuote>(&format!(
        "SELECT {} FROM crm_quotes WHERE quote_id = $1",
        CRM_QUOTE_COLUMNS
    ))
    .bind(quote_id)
    .fetch_optional(executor)
    .await?;

    Ok(row)
}

/// Update the quote status
pub async fn update_status<'e, E>(executor: E, id: i32, status: QuoteStatus) -> Result<Quote, ApiError>
where
    E: PgExecutor<'e>,
{
    let quote = sqlx::query_as::<_, Quote>(&format!(
        "UPDATE quotes SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
        QUOTE_COLUMNS
    ))
    .bind(id)
    .bind(status)
    .fetch_one(executor)
    .await?;

    Ok(quote)
}

/// Mirror a status change onto the CRM row
pub async fn update_crm_status<'e, E>(executor: E, quote_id: i32, status: QuoteStatus) -> Result<(), ApiError>
where
    E: PgExecutor<'e>,
{
    sqlx::query("UPDATE crm_quotes SET status = $2, updated_at = NOW() WHERE quote_id = $1")
        .bind(quote_id)
        .bind(status)
        .execute(executor)
        .await?;

    Ok(())
}
