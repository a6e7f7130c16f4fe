//! # Transaction Posting Plan
//!
//! The pure half of the Transaction Posting Engine: given the requested
//! line items and the current state of the referenced products, either
//! produce a fully-computed plan (line subtotals, grand total, per-product
//! stock deltas, optional debt) or reject the request before anything is
//! written.
//!
//! ## Posting Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Posting a Transaction                               │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │  PostingRequest { kind, items, notes, debt?, shipping? }       │
//! │       ▼                                                                 │
//! │  gudang-db: fetch referenced products (inside ONE db transaction)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build_plan() ← THIS MODULE (pure, no I/O)                             │
//! │       │   validates quantities, prices, stock sufficiency              │
//! │       │   computes subtotal = quantity × price, grand total, deltas    │
//! │       ▼                                                                 │
//! │  gudang-db: insert transaction + items, apply deltas, insert debt      │
//! │       │   (same db transaction — all or nothing)                       │
//! │       ▼                                                                 │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation is all-then-mutate-all: `build_plan` touches nothing, so a
//! stock-insufficiency failure on the third item cannot leave the first
//! two applied.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{DebtKind, Product, TransactionKind};
use crate::validation::{validate_name, validate_price, validate_quantity};
use crate::MAX_TRANSACTION_ITEMS;

// =============================================================================
// Request Types
// =============================================================================

/// One requested line item.
///
/// `price` is the unit price the caller captured at entry time (typically
/// copied from the product's sell/buy price). It is bounds-checked but not
/// re-derived; the subtotal, however, is always recomputed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRequest {
    pub product_id: String,
    pub quantity: i64,
    pub price: i64,
}

/// Optional request to open a debt alongside the transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtRequest {
    pub contact_name: String,
    pub contact_phone: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// Optional shipment info; accepted only on purchases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub tracking_number: String,
    pub courier_code: String,
}

/// A full posting request as accepted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingRequest {
    pub kind: TransactionKind,
    pub items: Vec<ItemRequest>,
    pub notes: Option<String>,
    pub debt: Option<DebtRequest>,
    pub shipping: Option<ShippingInfo>,
}

// =============================================================================
// Plan Types
// =============================================================================

/// A validated, fully-computed line item ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub product_id: String,
    pub quantity: i64,
    pub price: i64,
    /// quantity × price, recomputed here.
    pub subtotal: i64,
}

/// Net stock adjustment for one product (negative for sales).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDelta {
    pub product_id: String,
    pub delta: i64,
}

/// Debt to open alongside the transaction, already resolved to a kind
/// and amount.
#[derive(Debug, Clone)]
pub struct PlannedDebt {
    pub kind: DebtKind,
    pub contact_name: String,
    pub contact_phone: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// The complete outcome of plan computation. Applying a plan is pure
/// mechanism; every decision has already been made.
#[derive(Debug, Clone)]
pub struct PostingPlan {
    pub kind: TransactionKind,
    pub items: Vec<PlannedItem>,
    /// Σ subtotal over all items.
    pub total_amount: i64,
    /// One entry per distinct product, duplicates merged.
    pub deltas: Vec<StockDelta>,
    pub debt: Option<PlannedDebt>,
}

// =============================================================================
// Plan Computation
// =============================================================================

/// Builds a posting plan from a request and the referenced products.
///
/// ## Arguments
/// * `request` - The posting request
/// * `products` - Current state of every product the items reference,
///   keyed by id, as fetched inside the enclosing db transaction
///
/// ## Errors
/// * [`CoreError::EmptyTransaction`] - no items
/// * [`CoreError::ProductNotFound`] - an item references a missing product
/// * [`CoreError::InsufficientStock`] - a SALE asks for more units of a
///   product than it has (summed across lines referencing it)
/// * [`CoreError::ShippingNotAllowed`] - shipping info on a SALE
/// * [`CoreError::Validation`] - bad quantity, price or debt contact name
pub fn build_plan(
    request: &PostingRequest,
    products: &HashMap<String, Product>,
) -> CoreResult<PostingPlan> {
    if request.items.is_empty() {
        return Err(CoreError::EmptyTransaction);
    }
    if request.items.len() > MAX_TRANSACTION_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_TRANSACTION_ITEMS as i64,
        }
        .into());
    }
    if request.shipping.is_some() && request.kind != TransactionKind::Purchase {
        return Err(CoreError::ShippingNotAllowed);
    }

    let mut items = Vec::with_capacity(request.items.len());
    let mut total = Money::zero();
    // Demanded units per product, so the stock check covers the case of
    // the same product appearing on multiple lines.
    let mut demanded: HashMap<&str, i64> = HashMap::new();

    for item in &request.items {
        validate_quantity(item.quantity)?;
        validate_price("price", item.price)?;

        let product = products
            .get(&item.product_id)
            .ok_or_else(|| CoreError::ProductNotFound(item.product_id.clone()))?;

        *demanded.entry(product.id.as_str()).or_insert(0) += item.quantity;

        let subtotal = Money::from_rupiah(item.price).multiply_quantity(item.quantity);
        total += subtotal;

        items.push(PlannedItem {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            price: item.price,
            subtotal: subtotal.rupiah(),
        });
    }

    if request.kind == TransactionKind::Sale {
        for (product_id, qty) in &demanded {
            // products map is keyed by the same ids demanded was built from
            if let Some(product) = products.get(*product_id) {
                if *qty > product.stock {
                    return Err(CoreError::InsufficientStock {
                        name: product.name.clone(),
                        available: product.stock,
                        requested: *qty,
                    });
                }
            }
        }
    }

    let sign = request.kind.stock_sign();
    let mut deltas: Vec<StockDelta> = demanded
        .into_iter()
        .map(|(product_id, qty)| StockDelta {
            product_id: product_id.to_string(),
            delta: sign * qty,
        })
        .collect();
    // Deterministic order keeps write order stable across calls.
    deltas.sort_by(|a, b| a.product_id.cmp(&b.product_id));

    let debt = match &request.debt {
        Some(req) if !req.contact_name.trim().is_empty() => {
            validate_name("contact_name", &req.contact_name)?;
            Some(PlannedDebt {
                kind: request.kind.debt_kind(),
                contact_name: req.contact_name.trim().to_string(),
                contact_phone: req.contact_phone.clone(),
                due_date: req.due_date,
            })
        }
        // An empty contact name means "no debt", matching the form
        // behavior where the checkbox can be on with nothing filled in.
        _ => None,
    };

    Ok(PostingPlan {
        kind: request.kind,
        items,
        total_amount: total.rupiah(),
        deltas,
        debt,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, name: &str, stock: i64, sell_price: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            sku: format!("SKU-{id}"),
            name: name.to_string(),
            description: None,
            image: None,
            buy_price: sell_price / 2,
            sell_price,
            stock,
            min_stock: 3,
            unit: "pcs".to_string(),
            category_id: None,
            created_by: "u1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn products(list: Vec<Product>) -> HashMap<String, Product> {
        list.into_iter().map(|p| (p.id.clone(), p)).collect()
    }

    fn sale_request(items: Vec<ItemRequest>) -> PostingRequest {
        PostingRequest {
            kind: TransactionKind::Sale,
            items,
            notes: None,
            debt: None,
            shipping: None,
        }
    }

    #[test]
    fn test_sale_plan_totals_and_deltas() {
        let catalog = products(vec![product("p1", "Produk A", 10, 1_000)]);
        let request = sale_request(vec![ItemRequest {
            product_id: "p1".to_string(),
            quantity: 4,
            price: 1_000,
        }]);

        let plan = build_plan(&request, &catalog).unwrap();
        assert_eq!(plan.total_amount, 4_000);
        assert_eq!(plan.items[0].subtotal, 4_000);
        assert_eq!(plan.deltas, vec![StockDelta { product_id: "p1".to_string(), delta: -4 }]);
    }

    #[test]
    fn test_purchase_plan_increments() {
        let catalog = products(vec![product("p1", "Produk A", 10, 1_000)]);
        let request = PostingRequest {
            kind: TransactionKind::Purchase,
            items: vec![ItemRequest {
                product_id: "p1".to_string(),
                quantity: 25,
                price: 700,
            }],
            notes: None,
            debt: None,
            shipping: None,
        };

        let plan = build_plan(&request, &catalog).unwrap();
        assert_eq!(plan.total_amount, 17_500);
        assert_eq!(plan.deltas[0].delta, 25);
    }

    #[test]
    fn test_oversell_rejected_with_context() {
        let catalog = products(vec![product("p1", "Produk A", 10, 1_000)]);
        let request = sale_request(vec![ItemRequest {
            product_id: "p1".to_string(),
            quantity: 12,
            price: 1_000,
        }]);

        let err = build_plan(&request, &catalog).unwrap_err();
        match err {
            CoreError::InsufficientStock { name, available, requested } => {
                assert_eq!(name, "Produk A");
                assert_eq!(available, 10);
                assert_eq!(requested, 12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_lines_checked_cumulatively() {
        // Two lines of 6 against stock 10: each passes alone, together
        // they oversell and must be rejected.
        let catalog = products(vec![product("p1", "Produk A", 10, 1_000)]);
        let request = sale_request(vec![
            ItemRequest { product_id: "p1".to_string(), quantity: 6, price: 1_000 },
            ItemRequest { product_id: "p1".to_string(), quantity: 6, price: 1_000 },
        ]);

        let err = build_plan(&request, &catalog).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { requested: 12, .. }));
    }

    #[test]
    fn test_missing_product_rejected() {
        let catalog = products(vec![]);
        let request = sale_request(vec![ItemRequest {
            product_id: "ghost".to_string(),
            quantity: 1,
            price: 100,
        }]);

        let err = build_plan(&request, &catalog).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "ghost"));
    }

    #[test]
    fn test_empty_items_rejected() {
        let err = build_plan(&sale_request(vec![]), &products(vec![])).unwrap_err();
        assert!(matches!(err, CoreError::EmptyTransaction));
    }

    #[test]
    fn test_shipping_only_on_purchase() {
        let catalog = products(vec![product("p1", "Produk A", 10, 1_000)]);
        let mut request = sale_request(vec![ItemRequest {
            product_id: "p1".to_string(),
            quantity: 1,
            price: 1_000,
        }]);
        request.shipping = Some(ShippingInfo {
            tracking_number: "JX1234567890".to_string(),
            courier_code: "jne".to_string(),
        });

        let err = build_plan(&request, &catalog).unwrap_err();
        assert!(matches!(err, CoreError::ShippingNotAllowed));
    }

    #[test]
    fn test_debt_resolved_to_receivable_for_sale() {
        let catalog = products(vec![product("p1", "Produk A", 10, 1_000)]);
        let mut request = sale_request(vec![ItemRequest {
            product_id: "p1".to_string(),
            quantity: 2,
            price: 1_000,
        }]);
        request.debt = Some(DebtRequest {
            contact_name: "Budi Santoso".to_string(),
            contact_phone: Some("08123456789".to_string()),
            due_date: None,
        });

        let plan = build_plan(&request, &catalog).unwrap();
        let debt = plan.debt.unwrap();
        assert_eq!(debt.kind, DebtKind::Receivable);
        assert_eq!(debt.contact_name, "Budi Santoso");
    }

    #[test]
    fn test_blank_debt_contact_means_no_debt() {
        let catalog = products(vec![product("p1", "Produk A", 10, 1_000)]);
        let mut request = sale_request(vec![ItemRequest {
            product_id: "p1".to_string(),
            quantity: 2,
            price: 1_000,
        }]);
        request.debt = Some(DebtRequest {
            contact_name: "   ".to_string(),
            contact_phone: None,
            due_date: None,
        });

        let plan = build_plan(&request, &catalog).unwrap();
        assert!(plan.debt.is_none());
    }

    #[test]
    fn test_bad_quantity_and_price_rejected() {
        let catalog = products(vec![product("p1", "Produk A", 10, 1_000)]);

        let zero_qty = sale_request(vec![ItemRequest {
            product_id: "p1".to_string(),
            quantity: 0,
            price: 1_000,
        }]);
        assert!(build_plan(&zero_qty, &catalog).is_err());

        let negative_price = sale_request(vec![ItemRequest {
            product_id: "p1".to_string(),
            quantity: 1,
            price: -5,
        }]);
        assert!(build_plan(&negative_price, &catalog).is_err());
    }
}
