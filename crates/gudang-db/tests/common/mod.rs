//! Shared helpers for the gudang-db integration tests.
//!
//! Every test runs against a fresh in-memory SQLite database with the
//! migrations applied, so the suite needs no external services.

// Not every test binary uses every helper.
#![allow(dead_code)]

use chrono::Utc;
use uuid::Uuid;

use gudang_core::posting::{ItemRequest, PostingRequest};
use gudang_core::{Product, TransactionKind};
use gudang_db::{Database, DbConfig};

/// Fresh, fully migrated in-memory database.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database should initialize")
}

/// Seeds the admin user every posting attributes to.
pub async fn seed_user(db: &Database) -> String {
    db.users()
        .insert("Administrator", "admin@inventory.com", "not-a-real-hash", "ADMIN")
        .await
        .expect("user insert should succeed")
        .id
}

/// Seeds one product and returns it.
pub async fn seed_product(
    db: &Database,
    created_by: &str,
    name: &str,
    stock: i64,
    min_stock: i64,
    buy_price: i64,
    sell_price: i64,
) -> Product {
    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        sku: format!("SKU-{}", &Uuid::new_v4().to_string()[..8]),
        name: name.to_string(),
        description: None,
        image: None,
        buy_price,
        sell_price,
        stock,
        min_stock,
        unit: "pcs".to_string(),
        category_id: None,
        created_by: created_by.to_string(),
        created_at: now,
        updated_at: now,
    };
    db.products()
        .insert(&product)
        .await
        .expect("product insert should succeed");
    product
}

/// A bare posting request with no notes, debt or shipping.
pub fn request(kind: TransactionKind, items: Vec<(&str, i64, i64)>) -> PostingRequest {
    PostingRequest {
        kind,
        items: items
            .into_iter()
            .map(|(product_id, quantity, price)| ItemRequest {
                product_id: product_id.to_string(),
                quantity,
                price,
            })
            .collect(),
        notes: None,
        debt: None,
        shipping: None,
    }
}
