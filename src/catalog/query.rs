use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiError;

/// Effective unit price expression (discount price when positive)
const EFFECTIVE_PRICE: &str = "COALESCE(NULLIF(discount_price, 0), general_price)";

/// Default and maximum page size for catalog listings
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// SQL query builder for catalog listings
/// Builds a single parameterized query with filters, sorting, and pagination
pub struct ProductQueryBuilder {
    where_clauses: Vec<String>,
    params: Vec<String>,
    order_clause: String,
    limit: u32,
    offset: u64,
}

impl ProductQueryBuilder {
    /// Creates a builder listing active products ordered by name
    pub fn new() -> Self {
        Self {
            where_clauses: vec!["active = TRUE".to_string()],
            params: Vec::new(),
            order_clause: "name ASC".to_string(),
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }

    /// Adds a case-insensitive partial match on name or sku
    pub fn add_search_filter(&mut self, search: &str) {
        let param_index = self.params.len() + 1;
        self.where_clauses
            .push(format!("(name ILIKE ${0} OR sku ILIKE ${0})", param_index));
        self.params.push(format!("%{}%", search));
    }

    /// Adds inclusive bounds on the effective unit price
    /// Parameters are bound as text and cast server-side
    pub fn add_price_range(&mut self, min: Option<Decimal>, max: Option<Decimal>) {
        if let Some(min_price) = min {
            let param_index = self.params.len() + 1;
            self.where_clauses
                .push(format!("{} >= ${}::numeric", EFFECTIVE_PRICE, param_index));
            self.params.push(min_price.to_string());
        }

        if let Some(max_price) = max {
            let param_index = self.params.len() + 1;
            self.where_clauses
                .push(format!("{} <= ${}::numeric", EFFECTIVE_PRICE, param_index));
            self.params.push(max_price.to_string());
        }
    }

    /// Sets the ORDER BY clause; id breaks ties so pages are stable
    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        let field_sql = match field {
            SortField::Name => "name",
            SortField::Price => EFFECTIVE_PRICE,
        };
        let order_sql = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        self.order_clause = format!("{} {}", field_sql, order_sql);
    }

    /// Calculates LIMIT and OFFSET from a 1-indexed page
    pub fn set_pagination(&mut self, page: u32, limit: u32) {
        self.limit = limit;
        self.offset = u64::from(page.saturating_sub(1)) * u64::from(limit);
    }

    /// Returns the SQL text and the parameters in binding order
    pub fn build(&self, columns: &str) -> (String, Vec<String>) {
        let query = format!(
            "SELECT {} FROM products WHERE {} ORDER BY {}, id ASC LIMIT {} OFFSET {}",
            columns,
            self.where_clauses.join(" AND "),
            self.order_clause,
            self.limit,
            self.offset,
        );
        (query, self.params.clone())
    }
}

impl Default for ProductQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog query parameters extracted from the request
#[derive(Debug, Default, Deserialize)]
pub struct ProductQueryParams {
    /// Partial name or sku match
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// "name" or "price"
    pub sort: Option<String>,
    /// "asc" or "desc"
    pub order: Option<String>,
    /// 1-indexed page
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Validated and normalized catalog query
#[derive(Debug)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl ProductQuery {
    /// Validates raw parameters and applies defaults
    pub fn from_params(params: ProductQueryParams) -> Result<Self, ApiError> {
        let search = params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        for (name, value) in [("min_price", params.min_price), ("max_price", params.max_price)] {
            if value.is_some_and(|price| price.is_sign_negative()) {
                return Err(ApiError::BadRequest(format!("{} must not be negative", name)));
            }
        }
        if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
            if min > max {
                return Err(ApiError::BadRequest(
                    "min_price cannot be greater than max_price".to_string(),
                ));
            }
        }

        let sort_field = match params.sort.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("name") => SortField::Name,
            Some("price") => SortField::Price,
            Some(other) => {
                return Err(ApiError::BadRequest(format!(
                    "Invalid sort field '{}'. Must be 'name' or 'price'",
                    other
                )))
            }
        };

        let sort_order = match params.order.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(other) => {
                return Err(ApiError::BadRequest(format!(
                    "Invalid sort order '{}'. Must be 'asc' or 'desc'",
                    other
                )))
            }
        };

        let page = params.page.unwrap_or(1);
        if page == 0 {
            return Err(ApiError::BadRequest("page must be greater than 0".to_string()));
        }
        let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(ApiError::BadRequest(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        // (page - 1) * limit must fit the offset range
        if (page - 1).checked_mul(limit).is_none() {
            return Err(ApiError::BadRequest("page is out of range".to_string()));
        }

        Ok(Self {
            search,
            min_price: params.min_price,
            max_price: params.max_price,
            sort_field,
            sort_order,
            page,
            limit,
        })
    }

    /// Builds the SQL for this query
    pub fn to_builder(&self) -> ProductQueryBuilder {
        let mut builder = ProductQueryBuilder::new();
        if let Some(ref search) = self.search {
            builder.add_search_filter(search);
        }
        builder.add_price_range(self.min_price, self.max_price);
        builder.set_sort(self.sort_field, self.sort_order);
        builder.set_pagination(self.page, self.limit);
        builder
    }
}
