//! Category listing and creation.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use gudang_core::validation::validate_name;
use gudang_core::Category;
use gudang_db::repository::category::CategoryWithCount;

use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, Envelope};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    pub name: String,
    pub description: Option<String>,
}

/// GET /api/categories
pub async fn list(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<CategoryWithCount>>>> {
    let categories = state.db.categories().list_with_counts().await?;
    Ok(ok(categories))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateBody>,
) -> ApiResult<Json<Envelope<Category>>> {
    validate_name("name", &body.name).map_err(|e| ApiError::validation(e.to_string()))?;

    let name = body.name.trim();
    if state.db.categories().get_by_name(name).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "category '{name}' already exists"
        )));
    }

    let category = state
        .db
        .categories()
        .insert(name, body.description.as_deref())
        .await?;

    info!(name = %category.name, "Category created");

    Ok(ok(category))
}
