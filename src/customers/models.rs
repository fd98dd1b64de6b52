use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::formatting::{normalize_email, normalize_name, normalize_phone, normalize_tax_id, normalize_text};

/// Customer record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i32,
    #[schema(example = "Ana Pérez")]
    pub name: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub tax_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for creating a customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(
        length(min = 2, max = 160, message = "Name must be between 2 and 160 characters"),
        custom = "crate::validation::validate_not_blank"
    )]
    pub name: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(max = 32, message = "Phone must not exceed 32 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 160, message = "Company must not exceed 160 characters"))]
    pub company: Option<String>,
    #[validate(custom = "crate::validation::validate_tax_id")]
    pub tax_id: Option<String>,
}

/// Normalized values ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub tax_id: Option<String>,
}

impl From<CreateCustomerRequest> for NewCustomer {
    fn from(request: CreateCustomerRequest) -> Self {
        Self {
            name: normalize_name(&request.name),
            email: normalize_email(&request.email),
            phone: normalize_phone(request.phone.as_deref()),
            company: normalize_text(request.company.as_deref()),
            tax_id: normalize_tax_id(request.tax_id.as_deref()),
        }
    }
}
