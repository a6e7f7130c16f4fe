//! # Category Repository
//!
//! Database operations for product categories.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use gudang_core::Category;

/// A category together with how many products reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithCount {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub product_count: i64,
}

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists categories alphabetically, each with its product count.
    pub async fn list_with_counts(&self) -> DbResult<Vec<CategoryWithCount>> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: String,
            name: String,
            description: Option<String>,
            product_count: i64,
        }

        let rows: Vec<Row> = sqlx::query_as(
            "SELECT c.id, c.name, c.description, \
                    (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count \
             FROM categories c ORDER BY c.name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryWithCount {
                id: r.id,
                name: r.name,
                description: r.description,
                product_count: r.product_count,
            })
            .collect())
    }

    /// Gets a category by its unique name, for existence checks.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as(
            "SELECT id, name, description FROM categories WHERE name = ?1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - name already exists
    pub async fn insert(&self, name: &str, description: Option<&str>) -> DbResult<Category> {
        debug!(name = %name, "Inserting category");

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.map(|d| d.to_string()),
        };

        sqlx::query("INSERT INTO categories (id, name, description) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.description)
            .execute(&self.pool)
            .await?;

        Ok(category)
    }

    /// Gets a category by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as(
            "SELECT id, name, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }
}
