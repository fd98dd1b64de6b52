// HTTP handlers for checkout and order endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::error::ApiError;
use crate::extract::{AppJson, AppPath};
use crate::orders::{OrderResponse, UpdateOrderStatusRequest};
use crate::response::ApiResponse;
use crate::AppState;

/// Handler for POST /ecommerce/carts/:id/checkout
/// Creates a pending order from an active cart
#[utoipa::path(
    post,
    path = "/ecommerce/carts/{id}/checkout",
    params(("id" = i32, Path, description = "Cart ID")),
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Cart empty or not active"),
        (status = 404, description = "Cart not found")
    ),
    tag = "orders"
)]
pub async fn checkout_cart_handler(
    State(state): State<AppState>,
    AppPath(cart_id): AppPath<i32>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponse>>), ApiError> {
    let order = state.orders.checkout(cart_id).await?;
    Ok(ApiResponse::with_message(order, "Order created").created())
}

/// Handler for GET /ecommerce/orders/:id
#[utoipa::path(
    get,
    path = "/ecommerce/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items", body = OrderResponse),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn get_order_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<OrderResponse>, ApiError> {
    let order = state.orders.get_order(id).await?;
    Ok(ApiResponse::new(order))
}

/// Handler for PATCH /ecommerce/orders/:id/status
#[utoipa::path(
    patch,
    path = "/ecommerce/orders/{id}/status",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "orders"
)]
pub async fn update_order_status_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(request): AppJson<UpdateOrderStatusRequest>,
) -> Result<ApiResponse<OrderResponse>, ApiError> {
    let order = state.orders.update_status(id, request.status).await?;
    Ok(ApiResponse::new(order))
}
