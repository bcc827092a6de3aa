// HTTP handlers for the menu catalog: public browsing plus admin CRUD

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::db::{self, CatalogTable};
use crate::error::ApiError;
use crate::menu::models::{
    Addon, AddonCategory, AddonCategoryRequest, Category, CategoryRequest, CreateAddon,
    CreateMenuItem, MenuItem, MenuItemDetail, UpdateAddon, UpdateMenuItem,
};
use crate::query::{MenuQueryBuilder, QueryParams, QueryValidator};

/// Handler for GET /api/menu
/// Supports search, category filtering, price range, sorting, and pagination
#[utoipa::path(
    get,
    path = "/api/menu",
    params(
        ("search" = Option<String>, Query, description = "Partial name match"),
        ("category" = Option<i32>, Query, description = "Category id filter"),
        ("min_price" = Option<f64>, Query, description = "Minimum price (inclusive)"),
        ("max_price" = Option<f64>, Query, description = "Maximum price (inclusive)"),
        ("sort" = Option<String>, Query, description = "Sort field: price or name"),
        ("order" = Option<String>, Query, description = "Sort order: asc or desc"),
        ("page" = Option<u32>, Query, description = "1-indexed page"),
        ("limit" = Option<u32>, Query, description = "Items per page (max 100)")
    ),
    responses(
        (status = 200, description = "List of menu items", body = Vec<MenuItem>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "menu"
)]
pub async fn get_menu_handler(
    Query(params): Query<QueryParams>,
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    tracing::debug!("Fetching menu with query parameters: {:?}", params);

    let validated = QueryValidator::validate(params)
        .map_err(|_e| ApiError::ValidationError(validator::ValidationErrors::new()))?;

    let mut builder = MenuQueryBuilder::new();

    if let Some(search) = validated.search {
        builder.add_search_filter(&search);
    }
    if let Some(category) = validated.category {
        builder.add_category_filter(category);
    }
    builder.add_price_range(validated.min_price, validated.max_price);

    if let Some(sort_field) = validated.sort_field {
        builder.set_sort(sort_field, validated.sort_order);
    }

    builder.set_pagination(validated.page, validated.limit);

    let (query_str, params) = builder.build();

    let mut query = sqlx::query_as::<_, MenuItem>(&query_str);
    for param in params {
        query = query.bind(param);
    }

    let items = query.fetch_all(state.menu_repo.pool()).await?;

    tracing::debug!("Query returned {} menu items", items.len());
    Ok(Json(items))
}

/// Handler for GET /api/menu/:id
/// Retrieves a menu item with its add-on groups
#[utoipa::path(
    get,
    path = "/api/menu/{id}",
    params(
        ("id" = i32, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Menu item found"),
        (status = 404, description = "Menu item not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "menu"
)]
pub async fn get_menu_item_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MenuItemDetail>, ApiError> {
    let detail = state
        .menu_repo
        .item_detail(id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "MenuItem".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(detail))
}

/// Handler for GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories", body = Vec<Category>),
        (status = 500, description = "Internal server error")
    ),
    tag = "menu"
)]
pub async fn list_categories_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.menu_repo.list_categories().await?;
    Ok(Json(categories))
}

// ----- admin: menu items -----

/// Handler for POST /api/admin/menu-items
#[utoipa::path(
    post,
    path = "/api/admin/menu-items",
    request_body = CreateMenuItem,
    responses(
        (status = 201, description = "Menu item created", body = MenuItem),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Duplicate menu item name"),
        (status = 500, description = "Internal server error")
    ),
    tag = "admin"
)]
pub async fn create_menu_item_handler(
    State(state): State<crate::AppState>,
    Json(payload): Json<CreateMenuItem>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    tracing::debug!("Creating new menu item: {}", payload.name);

    payload.validate()?;

    if db::name_exists(state.menu_repo.pool(), CatalogTable::MenuItems, &payload.name, None).await? {
        tracing::warn!("Attempt to create duplicate menu item: {}", payload.name);
        return Err(ApiError::Conflict {
            message: format!("Menu item with name '{}' already exists", payload.name),
        });
    }

    let item = state
        .menu_repo
        .create_item(
            &payload.name,
            &payload.description,
            payload.price,
            payload.category_id,
            &payload.image_url,
            payload.is_out_of_stock,
            &payload.addon_groups,
        )
        .await?;

    tracing::info!("Successfully created menu item with id: {}", item.id);
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for PUT /api/admin/menu-items/:id
/// Partial update; omitted fields keep their current values
pub async fn update_menu_item_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMenuItem>,
) -> Result<Json<MenuItem>, ApiError> {
    payload.validate()?;

    let existing = state
        .menu_repo
        .find_item_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "MenuItem".to_string(),
            id: id.to_string(),
        })?;

    if let Some(ref new_name) = payload.name {
        if new_name != &existing.name
            && db::name_exists(state.menu_repo.pool(), CatalogTable::MenuItems, new_name, Some(id))
                .await?
        {
            tracing::warn!("Attempt to update menu item {} to duplicate name: {}", id, new_name);
            return Err(ApiError::Conflict {
                message: format!("Menu item with name '{}' already exists", new_name),
            });
        }
    }

    let item = state
        .menu_repo
        .update_item(
            id,
            payload.name.as_deref().unwrap_or(&existing.name),
            payload.description.as_deref().unwrap_or(&existing.description),
            payload.price.unwrap_or(existing.price),
            payload.category_id.unwrap_or(existing.category_id),
            payload.image_url.as_deref().unwrap_or(&existing.image_url),
            payload.is_out_of_stock.unwrap_or(existing.is_out_of_stock),
            payload.addon_groups.as_deref(),
        )
        .await?;

    tracing::info!("Successfully updated menu item with id: {}", id);
    Ok(Json(item))
}

/// Handler for DELETE /api/admin/menu-items/:id
pub async fn delete_menu_item_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.menu_repo.delete_item(id).await?;

    tracing::info!("Successfully deleted menu item with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

// ----- admin: categories -----

/// Handler for POST /api/admin/categories
pub async fn create_category_handler(
    State(state): State<crate::AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    payload.validate()?;

    if db::name_exists(state.menu_repo.pool(), CatalogTable::Categories, &payload.name, None).await? {
        return Err(ApiError::Conflict {
            message: format!("Category with name '{}' already exists", payload.name),
        });
    }

    let category = state
        .menu_repo
        .create_category(&payload.name, payload.display_order)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Handler for PUT /api/admin/categories/:id
pub async fn update_category_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    payload.validate()?;

    if db::name_exists(state.menu_repo.pool(), CatalogTable::Categories, &payload.name, Some(id))
        .await?
    {
        return Err(ApiError::Conflict {
            message: format!("Category with name '{}' already exists", payload.name),
        });
    }

    let category = state
        .menu_repo
        .update_category(id, &payload.name, payload.display_order)
        .await?;

    Ok(Json(category))
}

/// Handler for DELETE /api/admin/categories/:id
pub async fn delete_category_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.menu_repo.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- admin: add-on categories -----

/// Handler for GET /api/admin/addon-categories
pub async fn list_addon_categories_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<AddonCategory>>, ApiError> {
    let categories = state.menu_repo.list_addon_categories().await?;
    Ok(Json(categories))
}

/// Handler for POST /api/admin/addon-categories
pub async fn create_addon_category_handler(
    State(state): State<crate::AppState>,
    Json(payload): Json<AddonCategoryRequest>,
) -> Result<(StatusCode, Json<AddonCategory>), ApiError> {
    payload.validate()?;

    if db::name_exists(state.menu_repo.pool(), CatalogTable::AddonCategories, &payload.name, None)
        .await?
    {
        return Err(ApiError::Conflict {
            message: format!("Add-on category with name '{}' already exists", payload.name),
        });
    }

    let category = state.menu_repo.create_addon_category(&payload.name).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Handler for PUT /api/admin/addon-categories/:id
pub async fn update_addon_category_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AddonCategoryRequest>,
) -> Result<Json<AddonCategory>, ApiError> {
    payload.validate()?;

    let category = state
        .menu_repo
        .update_addon_category(id, &payload.name)
        .await?;

    Ok(Json(category))
}

/// Handler for DELETE /api/admin/addon-categories/:id
pub async fn delete_addon_category_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.menu_repo.delete_addon_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- admin: add-ons -----

/// Query parameters for add-on listing
#[derive(Debug, Deserialize)]
pub struct AddonListQuery {
    pub category: Option<i32>,
}

/// Handler for GET /api/admin/addons
pub async fn list_addons_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<AddonListQuery>,
) -> Result<Json<Vec<Addon>>, ApiError> {
    let addons = state.menu_repo.list_addons(query.category).await?;
    Ok(Json(addons))
}

/// Handler for POST /api/admin/addons
pub async fn create_addon_handler(
    State(state): State<crate::AppState>,
    Json(payload): Json<CreateAddon>,
) -> Result<(StatusCode, Json<Addon>), ApiError> {
    payload.validate()?;

    let addon = state
        .menu_repo
        .create_addon(
            payload.addon_category_id,
            &payload.name,
            payload.price,
            payload.is_active,
            payload.display_order,
        )
        .await?;

    tracing::info!("Created addon {} ({})", addon.id, addon.name);
    Ok((StatusCode::CREATED, Json(addon)))
}

/// Handler for PUT /api/admin/addons/:id
pub async fn update_addon_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAddon>,
) -> Result<Json<Addon>, ApiError> {
    payload.validate()?;

    let addon = state
        .menu_repo
        .update_addon(
            id,
            payload.name.as_deref(),
            payload.price,
            payload.is_active,
            payload.display_order,
        )
        .await?;

    Ok(Json(addon))
}

/// Handler for DELETE /api/admin/addons/:id
pub async fn delete_addon_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.menu_repo.delete_addon(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
