// HTTP handlers for customer endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::customers::{repository, CreateCustomerRequest, Customer, NewCustomer};
use crate::error::ApiError;
use crate::extract::{AppJson, AppPath};
use crate::response::ApiResponse;
use crate::AppState;

/// Handler for POST /ecommerce/customers
#[utoipa::path(
    post,
    path = "/ecommerce/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Email already registered")
    ),
    tag = "customers"
)]
pub async fn create_customer_handler(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Customer>>), ApiError> {
    payload.validate()?;

    let customer = repository::create(&state.db, &NewCustomer::from(payload)).await?;

    tracing::info!("Created customer {}", customer.id);
    Ok(ApiResponse::with_message(customer, "Customer created").created())
}

/// Handler for GET /ecommerce/customers/:id
#[utoipa::path(
    get,
    path = "/ecommerce/customers/{id}",
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer found", body = Customer),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers"
)]
pub async fn get_customer_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<Customer>, ApiError> {
    let customer = repository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", id))?;

    Ok(ApiResponse::new(customer))
}
