//! # Repository Module
//!
//! Database repository implementations for Gudang.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │  db.products().get_by_id(id)                                   │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self, search, category, page, limit)                        │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── update(&self, product)                                            │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • Clean separation of concerns                                        │
//! │  • The posting engine's atomic commit lives behind one method          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD and stock queries
//! - [`category::CategoryRepository`] - Category CRUD
//! - [`transaction::TransactionRepository`] - Posting and transaction reads
//! - [`debt::DebtRepository`] - Debt ledger and payments
//! - [`user::UserRepository`] - Operator accounts
//! - [`report::ReportRepository`] - Dashboard / profit-loss / stock reports

pub mod category;
pub mod debt;
pub mod product;
pub mod report;
pub mod transaction;
pub mod user;
