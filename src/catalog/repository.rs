use sqlx::PgExecutor;

use crate::catalog::{Product, ProductQuery};
use crate::error::ApiError;

const PRODUCT_COLUMNS: &str =
    "id, sku, name, general_price, discount_price, active, created_at, updated_at";

/// Find a product by ID
pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Product>, ApiError>
where
    E: PgExecutor<'e>,
{
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE id = $1",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(product)
}

/// Find multiple products by IDs in one round trip
/// Ids that do not exist are simply absent from the result
pub async fn find_by_ids<'e, E>(executor: E, ids: &[i32]) -> Result<Vec<Product>, ApiError>
where
    E: PgExecutor<'e>,
{
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE id = ANY($1)",
        PRODUCT_COLUMNS
    ))
    .bind(ids)
    .fetch_all(executor)
    .await?;

    Ok(products)
}

/// Run a validated catalog query
pub async fn search<'e, E>(executor: E, query: &ProductQuery) -> Result<Vec<Product>, ApiError>
where
    E: PgExecutor<'e>,
{
    let (sql, params) = query.to_builder().build(PRODUCT_COLUMNS);

    let mut statement = sqlx::query_as::<_, Product>(&sql);
    for param in params {
        statement = statement.bind(param);
    }

    let products = statement.fetch_all(executor).await?;
    Ok(products)
}
