// HTTP handlers for cart endpoints

use axum::extract::State;
use validator::Validate;

use crate::carts::{AddCartItemRequest, CartResponse};
use crate::error::ApiError;
use crate::extract::{AppJson, AppPath};
use crate::response::ApiResponse;
use crate::AppState;

/// Handler for GET /ecommerce/carts/:id
#[utoipa::path(
    get,
    path = "/ecommerce/carts/{id}",
    params(("id" = i32, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart with items and totals", body = CartResponse),
        (status = 404, description = "Cart not found")
    ),
    tag = "carts"
)]
pub async fn get_cart_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<CartResponse>, ApiError> {
    let cart = state.carts.get_cart(id).await?;
    Ok(ApiResponse::new(cart))
}

/// Handler for POST /ecommerce/carts/:id/items
#[utoipa::path(
    post,
    path = "/ecommerce/carts/{id}/items",
    params(("id" = i32, Path, description = "Cart ID")),
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Item added", body = CartResponse),
        (status = 400, description = "Invalid quantity or cart not active"),
        (status = 404, description = "Cart or product not found")
    ),
    tag = "carts"
)]
pub async fn add_cart_item_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<AddCartItemRequest>,
) -> Result<ApiResponse<CartResponse>, ApiError> {
    payload.validate()?;

    let cart = state.carts.add_item(id, payload).await?;
    Ok(ApiResponse::with_message(cart, "Item added to cart"))
}

/// Handler for DELETE /ecommerce/carts/:id/items/:product_id
#[utoipa::path(
    delete,
    path = "/ecommerce/carts/{id}/items/{product_id}",
    params(
        ("id" = i32, Path, description = "Cart ID"),
        ("product_id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Item removed", body = CartResponse),
        (status = 400, description = "Cart not active"),
        (status = 404, description = "Cart or line not found")
    ),
    tag = "carts"
)]
pub async fn remove_cart_item_handler(
    State(state): State<AppState>,
    AppPath((id, product_id)): AppPath<(i32, i32)>,
) -> Result<ApiResponse<CartResponse>, ApiError> {
    let cart = state.carts.remove_item(id, product_id).await?;
    Ok(ApiResponse::with_message(cart, "Item removed from cart"))
}
