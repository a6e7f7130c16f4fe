//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Paged listing with name/SKU substring search and category filter
//! - CRUD with SKU uniqueness surfaced as a typed error
//! - Deletion blocked while transaction history references the product

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use gudang_core::Product;

const PRODUCT_COLUMNS: &str = "id, sku, name, description, image, buy_price, sell_price, \
     stock, min_stock, unit, category_id, created_by, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products, newest first, with optional filters.
    ///
    /// ## Arguments
    /// * `search` - substring matched against name and SKU; empty matches all
    /// * `category_id` - exact category filter; empty matches all
    /// * `page` - 1-based page number
    /// * `limit` - page size
    ///
    /// ## Returns
    /// The page of products and the total row count for the filter.
    pub async fn list(
        &self,
        search: &str,
        category_id: &str,
        page: u32,
        limit: u32,
    ) -> DbResult<(Vec<Product>, i64)> {
        let search = search.trim();
        debug!(search = %search, category = %category_id, page, limit, "Listing products");

        let offset = (page.max(1) - 1) as i64 * limit as i64;

        let filter = "WHERE (?1 = '' OR name LIKE '%' || ?1 || '%' OR sku LIKE '%' || ?1 || '%') \
             AND (?2 = '' OR category_id = ?2)";

        let products: Vec<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products {filter} \
             ORDER BY created_at DESC LIMIT ?3 OFFSET ?4"
        ))
        .bind(search)
        .bind(category_id)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products {filter}"))
            .bind(search)
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((products, total))
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU, for uniqueness checks.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - inserted
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                 id, sku, name, description, image, buy_price, sell_price, \
                 stock, min_stock, unit, category_id, created_by, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.image)
        .bind(product.buy_price)
        .bind(product.sell_price)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(&product.unit)
        .bind(&product.category_id)
        .bind(&product.created_by)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product (all mutable fields; the handler merges
    /// partial input against the stored row first).
    ///
    /// Stock is included here because a catalog edit may correct it; the
    /// posting engine adjusts stock through its own guarded delta update,
    /// never through this method.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                 sku = ?2, name = ?3, description = ?4, image = ?5, \
                 buy_price = ?6, sell_price = ?7, stock = ?8, min_stock = ?9, \
                 unit = ?10, category_id = ?11, updated_at = ?12 \
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.image)
        .bind(product.buy_price)
        .bind(product.sell_price)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(&product.unit)
        .bind(&product.category_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] while any transaction
    /// item still references the product: sale history must stay
    /// reconstructible.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let references: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transaction_items WHERE product_id = ?1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if references > 0 {
            return Err(DbError::ForeignKeyViolation {
                message: format!("product {id} is referenced by {references} transaction item(s)"),
            });
        }

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Products at or below their minimum stock, most depleted first.
    /// Feeds the notifications feed.
    pub async fn low_stock(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE stock <= min_stock ORDER BY stock ASC LIMIT ?1"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
