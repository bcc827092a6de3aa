use serde::Deserialize;

/// SQL query builder for the public menu listing
/// Builds a single parameterized query with filters, sorting, and pagination
pub struct MenuQueryBuilder {
    base_query: String,
    where_clauses: Vec<String>,
    params: Vec<String>,
    order_clause: Option<String>,
    limit: u32,
    offset: u32,
}

impl MenuQueryBuilder {
    /// Creates a new MenuQueryBuilder with default values
    pub fn new() -> Self {
        Self {
            base_query: "SELECT id, name, description, price, category_id, image_url, \
                         is_out_of_stock, created_at, updated_at FROM menu_items"
                .to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_clause: None,
            limit: 20,
            offset: 0,
        }
    }

    /// Adds a search filter for partial name matching (case-insensitive)
    pub fn add_search_filter(&mut self, search: &str) {
        let param_index = self.params.len() + 1;
        self.where_clauses.push(format!("name ILIKE ${}", param_index));
        self.params.push(format!("%{}%", search));
    }

    /// Adds a category filter
    ///
    /// Parameters are carried as text and cast in SQL so all binds share one type.
    pub fn add_category_filter(&mut self, category_id: i32) {
        let param_index = self.params.len() + 1;
        self.where_clauses
            .push(format!("category_id = ${}::int", param_index));
        self.params.push(category_id.to_string());
    }

    /// Adds price range filters (min and/or max), both bounds inclusive
    pub fn add_price_range(&mut self, min: Option<f64>, max: Option<f64>) {
        if let Some(min_price) = min {
            let param_index = self.params.len() + 1;
            self.where_clauses
                .push(format!("price >= ${}::numeric", param_index));
            self.params.push(min_price.to_string());
        }

        if let Some(max_price) = max {
            let param_index = self.params.len() + 1;
            self.where_clauses
                .push(format!("price <= ${}::numeric", param_index));
            self.params.push(max_price.to_string());
        }
    }

    /// Sets the sort order for the query
    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        let field_name = match field {
            SortField::Price => "price",
            SortField::Name => "name",
        };

        let order_str = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        self.order_clause = Some(format!("{} {}", field_name, order_str));
    }

    /// Sets pagination parameters from a 1-indexed page number
    pub fn set_pagination(&mut self, page: u32, limit: u32) {
        self.limit = limit;
        self.offset = (page - 1) * limit;
    }

    /// Builds the final SQL query string with all parameters
    /// Returns a tuple of (query_string, parameters)
    pub fn build(&self) -> (String, Vec<String>) {
        let mut query = self.base_query.clone();

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(ref order) = self.order_clause {
            query.push_str(" ORDER BY ");
            query.push_str(order);
        }

        // LIMIT and OFFSET are integers computed server-side, not bound parameters
        query.push_str(&format!(" LIMIT {}", self.limit));
        query.push_str(&format!(" OFFSET {}", self.offset));

        (query, self.params.clone())
    }
}

impl Default for MenuQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters extracted from the HTTP request
/// All fields are optional to support flexible querying
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// Search term for partial name matching (case-insensitive)
    pub search: Option<String>,
    /// Filter by category id
    pub category: Option<i32>,
    /// Minimum price filter (inclusive)
    pub min_price: Option<f64>,
    /// Maximum price filter (inclusive)
    pub max_price: Option<f64>,
    /// Sort field: "price" or "name"
    pub sort: Option<String>,
    /// Sort order: "asc" or "desc"
    pub order: Option<String>,
    /// Page number (1-indexed, defaults to 1)
    pub page: Option<u32>,
    /// Items per page (defaults to 20)
    pub limit: Option<u32>,
}

/// Sort field options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    Name,
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Validated and normalized query parameters
#[derive(Debug)]
pub struct ValidatedQuery {
    pub search: Option<String>,
    pub category: Option<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

/// Validation error type for query parameters
#[derive(Debug)]
pub struct QueryValidationError {
    pub message: String,
}

impl std::fmt::Display for QueryValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for QueryValidationError {}

/// Query parameter validator
pub struct QueryValidator;

impl QueryValidator {
    /// Validates and normalizes query parameters
    pub fn validate(params: QueryParams) -> Result<ValidatedQuery, QueryValidationError> {
        let search = Self::normalize_string(params.search);

        if let Some(category) = params.category {
            if category <= 0 {
                return Err(QueryValidationError {
                    message: "category must be a positive id".to_string(),
                });
            }
        }

        if let Some(min) = params.min_price {
            Self::validate_price(min, "min_price")?;
        }
        if let Some(max) = params.max_price {
            Self::validate_price(max, "max_price")?;
        }
        if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
            if max < min {
                return Err(QueryValidationError {
                    message: "max_price must be >= min_price".to_string(),
                });
            }
        }

        let sort_field = match params.sort.as_deref().map(str::to_lowercase).as_deref() {
            Some("price") => Some(SortField::Price),
            Some("name") => Some(SortField::Name),
            Some(other) => {
                return Err(QueryValidationError {
                    message: format!("unknown sort field: {}", other),
                })
            }
            None => None,
        };

        let sort_order = match params.order.as_deref().map(str::to_lowercase).as_deref() {
            Some("desc") => SortOrder::Desc,
            Some("asc") | None => SortOrder::Asc,
            Some(other) => {
                return Err(QueryValidationError {
                    message: format!("unknown sort order: {}", other),
                })
            }
        };

        let page = params.page.unwrap_or(1);
        if page == 0 {
            return Err(QueryValidationError {
                message: "page must be >= 1".to_string(),
            });
        }

        let limit = params.limit.unwrap_or(20);
        if limit == 0 || limit > 100 {
            return Err(QueryValidationError {
                message: "limit must be between 1 and 100".to_string(),
            });
        }

        Ok(ValidatedQuery {
            search,
            category: params.category,
            min_price: params.min_price,
            max_price: params.max_price,
            sort_field,
            sort_order,
            page,
            limit,
        })
    }

    /// Trims a string parameter, mapping empty results to None
    fn normalize_string(value: Option<String>) -> Option<String> {
        value
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn validate_price(price: f64, field: &str) -> Result<(), QueryValidationError> {
        if price < 0.0 || !price.is_finite() {
            return Err(QueryValidationError {
                message: format!("{} must be a non-negative number", field),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_params() -> QueryParams {
        QueryParams {
            search: None,
            category: None,
            min_price: None,
            max_price: None,
            sort: None,
            order: None,
            page: None,
            limit: None,
        }
    }

    #[test]
    fn test_build_defaults() {
        let builder = MenuQueryBuilder::new();
        let (query, params) = builder.build();

        assert!(query.ends_with("LIMIT 20 OFFSET 0"));
        assert!(!query.contains("WHERE"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_with_all_filters() {
        let mut builder = MenuQueryBuilder::new();
        builder.add_search_filter("latte");
        builder.add_category_filter(3);
        builder.add_price_range(Some(100.0), Some(900.0));
        builder.set_sort(SortField::Price, SortOrder::Desc);
        builder.set_pagination(2, 10);

        let (query, params) = builder.build();

        assert!(query.contains("name ILIKE $1"));
        assert!(query.contains("category_id = $2::int"));
        assert!(query.contains("price >= $3::numeric"));
        assert!(query.contains("price <= $4::numeric"));
        assert!(query.contains("ORDER BY price DESC"));
        assert!(query.ends_with("LIMIT 10 OFFSET 10"));
        assert_eq!(params, vec!["%latte%", "3", "100", "900"]);
    }

    #[test]
    fn test_validator_defaults() {
        let validated = QueryValidator::validate(empty_params()).unwrap();

        assert_eq!(validated.page, 1);
        assert_eq!(validated.limit, 20);
        assert_eq!(validated.sort_order, SortOrder::Asc);
        assert!(validated.search.is_none());
    }

    #[test]
    fn test_validator_trims_search() {
        let mut params = empty_params();
        params.search = Some("  mocha  ".to_string());

        let validated = QueryValidator::validate(params).unwrap();
        assert_eq!(validated.search.as_deref(), Some("mocha"));
    }

    #[test]
    fn test_validator_rejects_inverted_price_range() {
        let mut params = empty_params();
        params.min_price = Some(500.0);
        params.max_price = Some(100.0);

        assert!(QueryValidator::validate(params).is_err());
    }

    #[test]
    fn test_validator_rejects_zero_page() {
        let mut params = empty_params();
        params.page = Some(0);

        assert!(QueryValidator::validate(params).is_err());
    }

    #[test]
    fn test_validator_rejects_unknown_sort() {
        let mut params = empty_params();
        params.sort = Some("rating".to_string());

        assert!(QueryValidator::validate(params).is_err());
    }
}
