//! # Seed Data Generator
//!
//! Populates the database with the development admin account, default
//! categories and a handful of sample products.
//!
//! ## Usage
//! ```bash
//! cargo run -p gudang-server --bin seed
//!
//! # Against a specific database
//! DATABASE_PATH=./data/gudang.db cargo run -p gudang-server --bin seed
//! ```
//!
//! Idempotent: everything is existence-check-then-create, so running it
//! twice changes nothing.

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use gudang_core::Product;
use gudang_db::{Database, DbConfig};
use gudang_server::auth::hash_password;
use gudang_server::Config;

const ADMIN_EMAIL: &str = "admin@inventory.com";
const ADMIN_PASSWORD: &str = "admin123";

const CATEGORIES: &[(&str, &str)] = &[
    ("Elektronik", "Perangkat elektronik dan aksesoris"),
    ("Makanan & Minuman", "Produk makanan dan minuman"),
    ("Pakaian", "Pakaian dan aksesoris fashion"),
    ("Alat Tulis", "Peralatan tulis dan kantor"),
    ("Rumah Tangga", "Peralatan rumah tangga"),
];

/// (name, sku, description, buy, sell, stock, min_stock, unit, category index)
#[allow(clippy::type_complexity)]
const PRODUCTS: &[(&str, &str, &str, i64, i64, i64, i64, &str, usize)] = &[
    (
        "Laptop ASUS VivoBook",
        "ELEC-001",
        "Laptop ASUS VivoBook 14 inch, Intel Core i5, 8GB RAM",
        7_500_000,
        8_999_000,
        15,
        3,
        "unit",
        0,
    ),
    (
        "Mouse Logitech M331",
        "ELEC-002",
        "Mouse wireless Logitech M331 Silent Plus",
        180_000,
        250_000,
        50,
        10,
        "pcs",
        0,
    ),
    (
        "Indomie Goreng",
        "FOOD-001",
        "Indomie Mi Goreng Original",
        2_800,
        3_500,
        200,
        50,
        "pcs",
        1,
    ),
    (
        "Kaos Polos Hitam",
        "CLTH-001",
        "Kaos polos cotton combed 30s warna hitam",
        35_000,
        55_000,
        100,
        20,
        "pcs",
        2,
    ),
    (
        "Pulpen Pilot G-2",
        "STAT-001",
        "Pulpen gel Pilot G-2 0.5mm",
        12_000,
        18_000,
        80,
        15,
        "pcs",
        3,
    ),
    (
        "Rice Cooker Miyako",
        "HOME-001",
        "Rice cooker Miyako 1.8 liter",
        250_000,
        350_000,
        12,
        3,
        "unit",
        4,
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;

    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    info!("Seeding database...");

    // Admin user
    let admin = match db.users().find_by_email(ADMIN_EMAIL).await? {
        Some(user) => {
            info!(email = ADMIN_EMAIL, "Admin user already present");
            user
        }
        None => {
            let password_hash =
                hash_password(ADMIN_PASSWORD).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            let user = db
                .users()
                .insert("Administrator", ADMIN_EMAIL, &password_hash, "ADMIN")
                .await?;
            info!(email = %user.email, "Admin user created");
            user
        }
    };

    // Categories
    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for &(name, description) in CATEGORIES {
        let category = match db.categories().get_by_name(name).await? {
            Some(existing) => existing,
            None => db.categories().insert(name, Some(description)).await?,
        };
        category_ids.push(category.id);
    }
    info!(count = category_ids.len(), "Categories ready");

    // Sample products
    let mut created = 0;
    for &(name, sku, description, buy, sell, stock, min_stock, unit, category) in PRODUCTS {
        if db.products().get_by_sku(sku).await?.is_some() {
            continue;
        }

        let now = Utc::now();
        db.products()
            .insert(&Product {
                id: Uuid::new_v4().to_string(),
                sku: sku.to_string(),
                name: name.to_string(),
                description: Some(description.to_string()),
                image: None,
                buy_price: buy,
                sell_price: sell,
                stock,
                min_stock,
                unit: unit.to_string(),
                category_id: Some(category_ids[category].clone()),
                created_by: admin.id.clone(),
                created_at: now,
                updated_at: now,
            })
            .await?;
        created += 1;
    }
    info!(created, "Products seeded");

    info!("Seed complete");
    Ok(())
}
