use sqlx::PgExecutor;

use crate::customers::{Customer, NewCustomer};
use crate::error::ApiError;

/// Insert a customer; a duplicate email is reported as a conflict
pub async fn create<'e, E>(executor: E, customer: &NewCustomer) -> Result<Customer, ApiError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customers (name, email, phone, company, tax_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, phone, company, tax_id, created_at
        "#,
    )
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.phone)
    .bind(&customer.company)
    .bind(&customer.tax_id)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return ApiError::Conflict {
                    message: format!("Customer with email '{}' already exists", customer.email),
                };
            }
        }
        ApiError::DatabaseError(e)
    })
}

/// Find a customer by ID
pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Customer>, ApiError>
where
    E: PgExecutor<'e>,
{
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT id, name, email, phone, company, tax_id, created_at FROM customers WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(customer)
}

/// Check whether a customer exists
pub async fn exists<'e, E>(executor: E, id: i32) -> Result<bool, ApiError>
where
    E: PgExecutor<'e>,
{
    let exists: Option<bool> = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await?;

    Ok(exists.unwrap_or(false))
}
