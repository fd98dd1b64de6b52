// HTTP handlers for quote endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::error::ApiError;
use crate::extract::{AppJson, AppPath};
use crate::quotes::{
    ConversionResult, CreateQuoteRequest, NewQuote, QuoteResponse, UpdateQuoteStatusRequest,
    WebQuoteRequest,
};
use crate::response::ApiResponse;
use crate::AppState;

/// Handler for POST /cotizaciones
/// Quote request coming from the public web form
#[utoipa::path(
    post,
    path = "/cotizaciones",
    request_body = WebQuoteRequest,
    responses(
        (status = 201, description = "Quote created", body = QuoteResponse),
        (status = 400, description = "Invalid input data"),
        (status = 404, description = "Unknown products or customer")
    ),
    tag = "quotes"
)]
pub async fn create_web_quote_handler(
    State(state): State<AppState>,
    AppJson(payload): AppJson<WebQuoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<QuoteResponse>>), ApiError> {
    tracing::debug!("Web form quote request from {}", payload.email);
    payload.validate()?;

    let quote = state.quotes.create_quote(NewQuote::from(payload)).await?;
    Ok(ApiResponse::with_message(quote, "Quote created").created())
}

/// Handler for POST /ecommerce/quotes
#[utoipa::path(
    post,
    path = "/ecommerce/quotes",
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote created", body = QuoteResponse),
        (status = 400, description = "Invalid input data"),
        (status = 404, description = "Unknown products or customer")
    ),
    tag = "quotes"
)]
pub async fn create_quote_handler(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<QuoteResponse>>), ApiError> {
    tracing::debug!("Storefront quote request from {}", payload.contact.email);
    payload.validate()?;

    let quote = state.quotes.create_quote(NewQuote::from(payload)).await?;
    Ok(ApiResponse::with_message(quote, "Quote created").created())
}

/// Handler for GET /ecommerce/quotes/:id
#[utoipa::path(
    get,
    path = "/ecommerce/quotes/{id}",
    params(("id" = i32, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote with items", body = QuoteResponse),
        (status = 404, description = "Quote not found")
    ),
    tag = "quotes"
)]
pub async fn get_quote_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<QuoteResponse>, ApiError> {
    let quote = state.quotes.get_quote(id).await?;
    Ok(ApiResponse::new(quote))
}

/// Handler for POST /ecommerce/quotes/:id/convert-to-cart
#[utoipa::path(
    post,
    path = "/ecommerce/quotes/{id}/convert-to-cart",
    params(("id" = i32, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote lines copied into a cart", body = ConversionResult),
        (status = 404, description = "Quote not found"),
        (status = 409, description = "Quote already accepted or rejected")
    ),
    tag = "quotes"
)]
pub async fn convert_quote_to_cart_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<ConversionResult>, ApiError> {
    let result = state.quotes.convert_to_cart(id).await?;
    Ok(ApiResponse::with_message(result, "Quote converted to cart"))
}

/// Handler for PATCH /ecommerce/quotes/:id/status
#[utoipa::path(
    patch,
    path = "/ecommerce/quotes/{id}/status",
    params(("id" = i32, Path, description = "Quote ID")),
    request_body = UpdateQuoteStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = QuoteResponse),
        (status = 404, description = "Quote not found"),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "quotes"
)]
pub async fn update_quote_status_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateQuoteStatusRequest>,
) -> Result<ApiResponse<QuoteResponse>, ApiError> {
    let quote = state.quotes.update_status(id, payload.status).await?;
    Ok(ApiResponse::new(quote))
}
