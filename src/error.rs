// Error handling module for the commerce API
// Provides the crate-wide error type and its HTTP translation

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, warn};

/// Main error type for the API
/// Services, repositories and handlers all return Result<T, ApiError>
///
/// Each variant maps to one HTTP status code. Client-facing messages never
/// include database or internal details.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request payload failed validator checks
    /// Maps to HTTP 400 Bad Request
    #[error("Request validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Input is well formed but cannot be processed as sent
    /// Maps to HTTP 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    /// Referenced entity does not exist
    /// Maps to HTTP 404 Not Found
    #[error("{resource} with id {id} not found")]
    NotFound { resource: String, id: String },

    /// One or more products referenced by a quote do not exist
    /// Maps to HTTP 404 Not Found, missing ids are sent as details
    #[error("Products not found: {ids:?}")]
    ProductsNotFound { ids: Vec<i32> },

    /// Duplicate resource or state conflict
    /// Maps to HTTP 409 Conflict
    #[error("{message}")]
    Conflict { message: String },

    /// Status change not allowed from the current status
    /// Maps to HTTP 409 Conflict
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Database operation errors
    /// Maps to HTTP 500 Internal Server Error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Internal server errors
    /// Maps to HTTP 500 Internal Server Error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Failure envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false for failures
    pub ok: bool,

    /// Human-readable error message
    pub message: String,

    /// Optional structured payload (field errors, missing ids, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_response();
        (status, Json(body)).into_response()
    }
}

// Extractor rejections: malformed bodies, missing fields, wrong path or
// query types. The rejection text names the offending field.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Shorthand for a NotFound error on a resource with any displayable id
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging follows severity:
    /// - error!: database and internal errors (500-level)
    /// - warn!: conflicts
    /// - debug!: expected client errors (validation, not found)
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        let body = match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                ErrorResponse::new(
                    "Request validation failed",
                    Some(serde_json::to_value(errors).unwrap_or_else(|_| json!({}))),
                )
            }
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                ErrorResponse::new(message.clone(), None)
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                ErrorResponse::new(
                    self.to_string(),
                    Some(json!({ "resource": resource, "id": id })),
                )
            }
            ApiError::ProductsNotFound { ids } => {
                debug!("Products not found: {:?}", ids);
                ErrorResponse::new("Products not found", Some(json!({ "missingIds": ids })))
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);
                ErrorResponse::new(message.clone(), None)
            }
            ApiError::InvalidTransition { from, to } => {
                warn!("Rejected status transition from {} to {}", from, to);
                ErrorResponse::new(
                    self.to_string(),
                    Some(json!({ "from": from, "to": to })),
                )
            }
            ApiError::DatabaseError(db_error) => {
                // Full error stays in the logs only
                error!("Database error: {:?}", db_error);
                ErrorResponse::new("A database error occurred", None)
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                ErrorResponse::new("An internal server error occurred", None)
            }
        };
        (status, body)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } | ApiError::ProductsNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } | ApiError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::ValidationError(ValidationErrors::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::BadRequest("cart is empty".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("Quote", 7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::ProductsNotFound { ids: vec![1] }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict { message: "dup".into() }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::InvalidTransition { from: "rejected".into(), to: "under_review".into() }
                .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::InternalError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_products_not_found_lists_missing_ids() {
        let (status, body) = ApiError::ProductsNotFound { ids: vec![41, 99] }.to_error_response();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["message"], json!("Products not found"));
        assert_eq!(value["details"]["missingIds"], json!([41, 99]));
    }

    #[test]
    fn test_not_found_message_and_details() {
        let (_, body) = ApiError::not_found("Customer", 12).to_error_response();
        assert_eq!(body.message, "Customer with id 12 not found");
        let details = body.details.unwrap();
        assert_eq!(details["resource"], json!("Customer"));
        assert_eq!(details["id"], json!("12"));
    }

    #[test]
    fn test_validation_error_carries_field_details() {
        let mut errors = ValidationErrors::new();
        errors.add("email", ValidationError::new("email"));

        let (status, body) = ApiError::from(errors).to_error_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.details.unwrap().get("email").is_some());
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let (_, body) = ApiError::InternalError("secret connection string".into()).to_error_response();
        assert_eq!(body.message, "An internal server error occurred");
        assert!(body.details.is_none());

        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
        assert!(!json.contains("secret"));
    }
}
