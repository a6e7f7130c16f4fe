//! Product catalog CRUD.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use gudang_core::validation::{validate_name, validate_price, validate_sku, validate_stock_level};
use gudang_core::{Product, DEFAULT_MIN_STOCK, DEFAULT_UNIT};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, Envelope, Paginated};
use crate::state::AppState;

fn default_page() -> u32 {
    1
}
fn default_limit() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub buy_price: i64,
    pub sell_price: i64,
    #[serde(default)]
    pub stock: i64,
    pub min_stock: Option<i64>,
    pub unit: Option<String>,
    pub category_id: Option<String>,
}

/// All fields optional: absent ones keep their stored value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub buy_price: Option<i64>,
    pub sell_price: Option<i64>,
    pub stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub unit: Option<String>,
    pub category_id: Option<String>,
}

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Envelope<Paginated<Product>>>> {
    let limit = query.limit.clamp(1, 100);
    let (products, total) = state
        .db
        .products()
        .list(&query.search, &query.category, query.page, limit)
        .await?;

    Ok(ok(Paginated::new(products, total, query.page.max(1), limit)))
}

/// GET /api/products/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Product>>> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    Ok(ok(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateBody>,
) -> ApiResult<Json<Envelope<Product>>> {
    validate_name("name", &body.name).map_err(|e| ApiError::validation(e.to_string()))?;
    validate_sku(&body.sku).map_err(|e| ApiError::validation(e.to_string()))?;
    validate_price("buyPrice", body.buy_price).map_err(|e| ApiError::validation(e.to_string()))?;
    validate_price("sellPrice", body.sell_price)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    validate_stock_level("stock", body.stock).map_err(|e| ApiError::validation(e.to_string()))?;

    // Existence-check-then-create, so the client gets a clear 409 instead
    // of a bare constraint failure.
    if state.db.products().get_by_sku(body.sku.trim()).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "sku '{}' already exists",
            body.sku.trim()
        )));
    }

    let category_id = body.category_id.filter(|c| !c.is_empty());
    if let Some(category) = &category_id {
        if state.db.categories().get_by_id(category).await?.is_none() {
            return Err(ApiError::validation(format!(
                "category '{category}' does not exist"
            )));
        }
    }

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        sku: body.sku.trim().to_string(),
        name: body.name.trim().to_string(),
        description: body.description,
        image: body.image,
        buy_price: body.buy_price,
        sell_price: body.sell_price,
        stock: body.stock,
        min_stock: body.min_stock.unwrap_or(DEFAULT_MIN_STOCK),
        unit: body.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        category_id,
        created_by: user.id,
        created_at: now,
        updated_at: now,
    };

    state.db.products().insert(&product).await?;

    info!(sku = %product.sku, "Product created");

    Ok(ok(product))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBody>,
) -> ApiResult<Json<Envelope<Product>>> {
    let existing = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    // SKU uniqueness re-checked only when it actually changes.
    if let Some(sku) = &body.sku {
        let sku = sku.trim();
        validate_sku(sku).map_err(|e| ApiError::validation(e.to_string()))?;
        if sku != existing.sku && state.db.products().get_by_sku(sku).await?.is_some() {
            return Err(ApiError::Conflict(format!("sku '{sku}' already exists")));
        }
    }

    if let Some(category) = body.category_id.as_deref().filter(|c| !c.is_empty()) {
        if state.db.categories().get_by_id(category).await?.is_none() {
            return Err(ApiError::validation(format!(
                "category '{category}' does not exist"
            )));
        }
    }

    let merged = Product {
        id: existing.id.clone(),
        sku: body.sku.map(|s| s.trim().to_string()).unwrap_or(existing.sku),
        name: body.name.unwrap_or(existing.name),
        description: body.description.or(existing.description),
        image: body.image.or(existing.image),
        buy_price: body.buy_price.unwrap_or(existing.buy_price),
        sell_price: body.sell_price.unwrap_or(existing.sell_price),
        stock: body.stock.unwrap_or(existing.stock),
        min_stock: body.min_stock.unwrap_or(existing.min_stock),
        unit: body.unit.unwrap_or(existing.unit),
        category_id: match body.category_id {
            Some(c) if c.is_empty() => None,
            Some(c) => Some(c),
            None => existing.category_id,
        },
        created_by: existing.created_by,
        created_at: existing.created_at,
        updated_at: Utc::now(),
    };

    validate_name("name", &merged.name).map_err(|e| ApiError::validation(e.to_string()))?;
    validate_price("buyPrice", merged.buy_price)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    validate_price("sellPrice", merged.sell_price)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    validate_stock_level("stock", merged.stock)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    state.db.products().update(&merged).await?;

    Ok(ok(merged))
}

/// DELETE /api/products/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<&'static str>>> {
    state.db.products().delete(&id).await?;

    info!(id = %id, "Product deleted");

    Ok(ok("deleted"))
}
