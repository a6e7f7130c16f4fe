//! # Report Aggregation
//!
//! Pure read-side computations behind the dashboard, profit-and-loss and
//! stock reports. The database layer fetches rows; everything derived
//! from them — classifications, margins, month buckets — is computed
//! here so it can be tested without a database.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Product, TransactionDetail};

// =============================================================================
// Stock Classification
// =============================================================================

/// Per-product stock health, a pure function of (stock, min_stock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// stock = 0
    Out,
    /// 0 < stock ≤ min_stock
    Low,
    /// stock > min_stock
    Ok,
}

/// Classifies a stock level.
///
/// ## Example
/// ```rust
/// use gudang_core::reports::{stock_status, StockStatus};
///
/// assert_eq!(stock_status(0, 3), StockStatus::Out);
/// assert_eq!(stock_status(2, 3), StockStatus::Low);
/// assert_eq!(stock_status(6, 3), StockStatus::Ok);
/// ```
pub fn stock_status(stock: i64, min_stock: i64) -> StockStatus {
    if stock == 0 {
        StockStatus::Out
    } else if stock <= min_stock {
        StockStatus::Low
    } else {
        StockStatus::Ok
    }
}

// =============================================================================
// Profit & Loss
// =============================================================================

/// Profit-and-loss summary over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitLossReport {
    /// Σ SALE totals in range.
    pub total_revenue: i64,
    /// Σ PURCHASE totals in range.
    pub total_cost: i64,
    /// revenue − cost. May be negative.
    pub profit: i64,
    /// profit / revenue × 100, one decimal. 0 when revenue is 0.
    pub profit_margin: f64,
    pub total_sales_count: i64,
    pub total_purchase_count: i64,
}

/// Computes the margin percentage, rounded to one decimal place.
/// Reported as 0 when revenue is 0 so the report never divides by zero.
pub fn profit_margin(total_revenue: i64, total_cost: i64) -> f64 {
    if total_revenue <= 0 {
        return 0.0;
    }
    let profit = (total_revenue - total_cost) as f64;
    let margin = profit / total_revenue as f64 * 100.0;
    (margin * 10.0).round() / 10.0
}

/// Assembles the report from the two aggregate query results.
pub fn build_profit_loss(
    total_revenue: i64,
    total_cost: i64,
    total_sales_count: i64,
    total_purchase_count: i64,
) -> ProfitLossReport {
    ProfitLossReport {
        total_revenue,
        total_cost,
        profit: total_revenue - total_cost,
        profit_margin: profit_margin(total_revenue, total_cost),
        total_sales_count,
        total_purchase_count,
    }
}

// =============================================================================
// Monthly Sales Buckets
// =============================================================================

/// Indonesian month abbreviations, as shown on the dashboard chart.
pub const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agt", "Sep", "Okt", "Nov", "Des",
];

/// One month's SALE total, keyed "Mei 2026".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub month: String,
    pub total: i64,
}

/// Number of trailing calendar months on the dashboard chart.
pub const DASHBOARD_MONTHS: u32 = 6;

fn month_label(year: i32, month: u32) -> String {
    format!("{} {}", MONTH_ABBREVS[(month - 1) as usize], year)
}

/// Walks `back` calendar months backwards from (year, month).
fn shift_month(year: i32, month: u32, back: u32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) - back as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

/// Buckets per-transaction SALE rows into the trailing six calendar
/// months ending at `now`, zero-filling months with no activity.
/// Rows outside the window are dropped.
pub fn bucket_monthly_sales(
    now: DateTime<Utc>,
    rows: &[(DateTime<Utc>, i64)],
) -> Vec<MonthlySales> {
    let mut buckets: Vec<MonthlySales> = (0..DASHBOARD_MONTHS)
        .rev()
        .map(|back| {
            let (y, m) = shift_month(now.year(), now.month(), back);
            MonthlySales {
                month: month_label(y, m),
                total: 0,
            }
        })
        .collect();

    for (created_at, amount) in rows {
        let key = month_label(created_at.year(), created_at.month());
        if let Some(bucket) = buckets.iter_mut().find(|b| b.month == key) {
            bucket.total += amount;
        }
    }

    buckets
}

// =============================================================================
// Stock Report
// =============================================================================

/// One product's line in the stock valuation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReportLine {
    #[serde(flatten)]
    pub product: Product,
    /// stock × buy_price.
    pub stock_value: i64,
    pub status: StockStatus,
}

/// The full stock valuation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReport {
    pub products: Vec<StockReportLine>,
    /// Σ stock_value — the inventory valuation.
    pub total_value: i64,
    pub total_products: i64,
    /// Products with stock ≤ min_stock (includes out-of-stock).
    pub low_stock_count: i64,
    /// Products with stock = 0.
    pub out_of_stock_count: i64,
}

/// Builds the stock report from the full product list.
pub fn build_stock_report(products: Vec<Product>) -> StockReport {
    let total_products = products.len() as i64;
    let mut total_value = 0i64;
    let mut low = 0i64;
    let mut out = 0i64;

    let lines = products
        .into_iter()
        .map(|product| {
            let stock_value = product.stock * product.buy_price;
            total_value += stock_value;
            if product.stock <= product.min_stock {
                low += 1;
            }
            if product.stock == 0 {
                out += 1;
            }
            let status = stock_status(product.stock, product.min_stock);
            StockReportLine {
                product,
                stock_value,
                status,
            }
        })
        .collect();

    StockReport {
        products: lines,
        total_value,
        total_products,
        low_stock_count: low,
        out_of_stock_count: out,
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Everything the dashboard shows in one payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_products: i64,
    /// Products at or below their minimum stock.
    pub low_stock_products: i64,
    pub total_sales: i64,
    pub total_purchases: i64,
    /// All-time Σ SALE totals.
    pub total_revenue: i64,
    /// All-time Σ PURCHASE totals.
    pub total_expenses: i64,
    /// The 10 most recent transactions, newest first.
    pub recent_transactions: Vec<TransactionDetail>,
    /// Trailing six months of SALE totals, oldest first, zero-filled.
    pub monthly_sales: Vec<MonthlySales>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stock_status_classification() {
        assert_eq!(stock_status(0, 3), StockStatus::Out);
        assert_eq!(stock_status(0, 0), StockStatus::Out);
        assert_eq!(stock_status(1, 3), StockStatus::Low);
        assert_eq!(stock_status(3, 3), StockStatus::Low);
        assert_eq!(stock_status(4, 3), StockStatus::Ok);
        assert_eq!(stock_status(6, 3), StockStatus::Ok);
    }

    #[test]
    fn test_profit_margin_zero_revenue() {
        // No division by zero: zero revenue reports margin 0
        assert_eq!(profit_margin(0, 5_000), 0.0);
    }

    #[test]
    fn test_profit_margin_rounding() {
        // 1000 revenue, 667 cost → 33.3%
        assert_eq!(profit_margin(1_000, 667), 33.3);
        // Loss: -50%
        assert_eq!(profit_margin(1_000, 1_500), -50.0);
        assert_eq!(profit_margin(3_000, 1_000), 66.7);
    }

    #[test]
    fn test_build_profit_loss() {
        let report = build_profit_loss(10_000, 4_000, 7, 3);
        assert_eq!(report.profit, 6_000);
        assert_eq!(report.profit_margin, 60.0);
        assert_eq!(report.total_sales_count, 7);
        assert_eq!(report.total_purchase_count, 3);
    }

    #[test]
    fn test_monthly_buckets_zero_filled() {
        let now = Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap();
        let buckets = bucket_monthly_sales(now, &[]);

        assert_eq!(buckets.len(), 6);
        assert_eq!(buckets[0].month, "Mar 2026");
        assert_eq!(buckets[5].month, "Agt 2026");
        assert!(buckets.iter().all(|b| b.total == 0));
    }

    #[test]
    fn test_monthly_buckets_aggregate_and_cross_year() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap();
        let rows = vec![
            (Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap(), 1_000),
            (Utc.with_ymd_and_hms(2025, 12, 15, 0, 0, 0).unwrap(), 2_000),
            (Utc.with_ymd_and_hms(2025, 12, 20, 0, 0, 0).unwrap(), 500),
            (Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(), 4_000),
            // Outside the window, must be dropped
            (Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(), 9_999),
        ];

        let buckets = bucket_monthly_sales(now, &rows);
        assert_eq!(buckets[0].month, "Sep 2025");
        assert_eq!(buckets[0].total, 1_000);
        let des = buckets.iter().find(|b| b.month == "Des 2025").unwrap();
        assert_eq!(des.total, 2_500);
        let feb = buckets.iter().find(|b| b.month == "Feb 2026").unwrap();
        assert_eq!(feb.total, 4_000);
        assert_eq!(buckets.iter().map(|b| b.total).sum::<i64>(), 7_500);
    }

    fn product(stock: i64, min_stock: i64, buy_price: i64) -> Product {
        let now = Utc::now();
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            sku: "SKU".to_string(),
            name: "Produk".to_string(),
            description: None,
            image: None,
            buy_price,
            sell_price: buy_price * 2,
            stock,
            min_stock,
            unit: "pcs".to_string(),
            category_id: None,
            created_by: "u1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_stock_report_totals() {
        let report = build_stock_report(vec![
            product(10, 3, 1_000), // ok, value 10_000
            product(2, 3, 500),    // low, value 1_000
            product(0, 3, 700),    // out (also counts as low), value 0
        ]);

        assert_eq!(report.total_products, 3);
        assert_eq!(report.total_value, 11_000);
        assert_eq!(report.low_stock_count, 2);
        assert_eq!(report.out_of_stock_count, 1);
        assert_eq!(report.products[0].status, StockStatus::Ok);
        assert_eq!(report.products[1].status, StockStatus::Low);
        assert_eq!(report.products[2].status, StockStatus::Out);
    }
}
