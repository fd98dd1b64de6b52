// HTTP handlers for catalog browsing

use axum::extract::State;

use crate::catalog::{repository, ProductQuery, ProductQueryParams, ProductResponse};
use crate::error::ApiError;
use crate::extract::{AppPath, AppQuery};
use crate::response::ApiResponse;
use crate::AppState;

/// Handler for GET /ecommerce/products
#[utoipa::path(
    get,
    path = "/ecommerce/products",
    responses(
        (status = 200, description = "Active products", body = [ProductResponse]),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "catalog"
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ProductQueryParams>,
) -> Result<ApiResponse<Vec<ProductResponse>>, ApiError> {
    tracing::debug!("Listing products with {:?}", params);

    let query = ProductQuery::from_params(params)?;
    let products = repository::search(&state.db, &query).await?;

    tracing::debug!("Catalog query returned {} products", products.len());
    Ok(ApiResponse::new(
        products.into_iter().map(ProductResponse::from).collect(),
    ))
}

/// Handler for GET /ecommerce/products/:id
#[utoipa::path(
    get,
    path = "/ecommerce/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found")
    ),
    tag = "catalog"
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<ProductResponse>, ApiError> {
    let product = repository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    Ok(ApiResponse::new(product.into()))
}
