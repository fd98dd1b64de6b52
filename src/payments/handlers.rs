// HTTP handler for payment preferences

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::error::ApiError;
use crate::extract::AppPath;
use crate::payments::Payment;
use crate::response::ApiResponse;
use crate::AppState;

/// Handler for POST /ecommerce/orders/:id/payment-preference
#[utoipa::path(
    post,
    path = "/ecommerce/orders/{id}/payment-preference",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 201, description = "Preference created", body = Payment),
        (status = 200, description = "Existing pending preference", body = Payment),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not pending")
    ),
    tag = "payments"
)]
pub async fn create_payment_preference_handler(
    State(state): State<AppState>,
    AppPath(order_id): AppPath<i32>,
) -> Result<(StatusCode, Json<ApiResponse<Payment>>), ApiError> {
    let outcome = state.payments.create_preference(order_id).await?;

    if outcome.created {
        Ok(ApiResponse::with_message(outcome.payment, "Payment preference created").created())
    } else {
        Ok((StatusCode::OK, Json(ApiResponse::new(outcome.payment))))
    }
}
