use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use crate::error::ApiError;

/// Type alias for the PostgreSQL connection pool
pub type DbPool = PgPool;

/// Creates and configures a PostgreSQL connection pool
///
/// # Arguments
/// * `database_url` - PostgreSQL connection string
///
/// # Returns
/// * `Result<DbPool>` - Configured connection pool or error
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    tracing::debug!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Catalog tables that enforce unique names
#[derive(Debug, Clone, Copy)]
pub enum CatalogTable {
    MenuItems,
    Categories,
    AddonCategories,
}

impl CatalogTable {
    fn as_str(&self) -> &'static str {
        match self {
            CatalogTable::MenuItems => "menu_items",
            CatalogTable::Categories => "categories",
            CatalogTable::AddonCategories => "addon_categories",
        }
    }
}

/// Check whether a row with the given name already exists in a catalog table.
///
/// Used by the admin CRUD handlers to return 409s on duplicate names for
/// menu items, categories, add-on categories, and loyalty levels. Pass
/// `exclude_id` on updates so a row may keep its own name.
pub async fn name_exists(
    pool: &PgPool,
    table: CatalogTable,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<bool, ApiError> {
    // Table names come from a closed enum, never from request input.
    let sql = match exclude_id {
        Some(_) => format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE LOWER(name) = LOWER($1) AND id != $2)",
            table.as_str()
        ),
        None => format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE LOWER(name) = LOWER($1))",
            table.as_str()
        ),
    };

    let mut query = sqlx::query_scalar::<_, bool>(&sql).bind(name);
    if let Some(id) = exclude_id {
        query = query.bind(id);
    }

    let exists = query.fetch_one(pool).await?;
    Ok(exists)
}
