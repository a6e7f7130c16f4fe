//! CSV exports. The rows are the Reporting Aggregator's output verbatim,
//! formatted for the Indonesian locale (Rp amounts, dd/mm/yyyy dates);
//! no layout engine, just CSV the spreadsheet tools open directly.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use gudang_core::{Money, TransactionDetail};

use crate::error::{ApiError, ApiResult};
use crate::routes::reports::WindowQuery;
use crate::state::AppState;

/// Everything a journal export can reasonably hold; above this the
/// export is truncated rather than unbounded.
const EXPORT_LIMIT: u32 = 10_000;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// "SALE" (default) or "PURCHASE".
    #[serde(default, rename = "type")]
    pub kind: String,
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Quotes a CSV field when it needs quoting.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_response(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// One export row per transaction line item.
fn journal_rows(transactions: &[TransactionDetail]) -> Vec<String> {
    let mut rows = vec![csv_row(&[
        "No".to_string(),
        "Tanggal".to_string(),
        "Produk".to_string(),
        "SKU".to_string(),
        "Jumlah".to_string(),
        "Harga".to_string(),
        "Subtotal".to_string(),
        "Total Transaksi".to_string(),
        "Catatan".to_string(),
        "Oleh".to_string(),
    ])];

    let mut no = 1;
    for detail in transactions {
        for item in &detail.items {
            rows.push(csv_row(&[
                no.to_string(),
                format_date(detail.transaction.created_at),
                item.product_name.clone(),
                item.product_sku.clone(),
                item.quantity.to_string(),
                Money::from_rupiah(item.price).to_string(),
                Money::from_rupiah(item.subtotal).to_string(),
                Money::from_rupiah(detail.transaction.total_amount).to_string(),
                detail.transaction.notes.clone().unwrap_or_else(|| "-".to_string()),
                detail.created_by_name.clone(),
            ]));
            no += 1;
        }
    }

    let grand_total: i64 = transactions
        .iter()
        .map(|t| t.transaction.total_amount)
        .sum();
    rows.push(String::new());
    rows.push(csv_row(&[
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        "TOTAL".to_string(),
        Money::from_rupiah(grand_total).to_string(),
        String::new(),
        String::new(),
    ]));

    rows
}

/// GET /api/export/transactions?type=SALE|PURCHASE
pub async fn transactions(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let (kind, label) = match query.kind.as_str() {
        "" | "SALE" => ("SALE", "penjualan"),
        "PURCHASE" => ("PURCHASE", "pembelian"),
        other => {
            return Err(ApiError::validation(format!(
                "type must be SALE or PURCHASE, got '{other}'"
            )))
        }
    };

    let (transactions, _) = state.db.transactions().list(kind, 1, EXPORT_LIMIT).await?;

    let mut rows = vec![
        csv_row(&[format!("LAPORAN {}", label.to_uppercase())]),
        csv_row(&[format!("Tanggal Export: {}", format_date(Utc::now()))]),
        String::new(),
    ];
    rows.extend(journal_rows(&transactions));

    Ok(csv_response(
        &format!("laporan-{label}.csv"),
        rows.join("\n"),
    ))
}

/// GET /api/export/profit-loss?startDate=&endDate=
pub async fn profit_loss(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Response> {
    let (start, end) = query.resolve()?;
    let report = state.db.reports().profit_loss(start, end).await?;

    let period = match (&query.start_date, &query.end_date) {
        (Some(s), Some(e)) if !s.is_empty() && !e.is_empty() => format!("Periode: {s} s/d {e}"),
        _ => "Periode: Semua".to_string(),
    };

    let profit_label = if report.profit >= 0 {
        "LABA BERSIH"
    } else {
        "RUGI BERSIH"
    };

    let rows = vec![
        csv_row(&["LAPORAN LABA RUGI".to_string()]),
        csv_row(&[period]),
        String::new(),
        csv_row(&["Keterangan".to_string(), "Jumlah".to_string()]),
        csv_row(&[
            "Total Pendapatan (Penjualan)".to_string(),
            Money::from_rupiah(report.total_revenue).to_string(),
        ]),
        csv_row(&[
            "Jumlah Transaksi Penjualan".to_string(),
            report.total_sales_count.to_string(),
        ]),
        csv_row(&[
            "Total Pengeluaran (Pembelian)".to_string(),
            Money::from_rupiah(report.total_cost).to_string(),
        ]),
        csv_row(&[
            "Jumlah Transaksi Pembelian".to_string(),
            report.total_purchase_count.to_string(),
        ]),
        String::new(),
        csv_row(&[
            profit_label.to_string(),
            Money::from_rupiah(report.profit.abs()).to_string(),
        ]),
        csv_row(&[
            "Margin (%)".to_string(),
            format!("{:.1}%", report.profit_margin),
        ]),
    ];

    Ok(csv_response("laporan-laba-rugi.csv", rows.join("\n")))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("has, comma"), "\"has, comma\"");
        assert_eq!(csv_field("has \"quote\""), "\"has \"\"quote\"\"\"");
    }

    #[test]
    fn test_date_formatting() {
        let date = DateTime::parse_from_rfc3339("2026-08-05T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_date(date), "05/08/2026");
    }

    #[test]
    fn test_journal_rows_total() {
        let rows = journal_rows(&[]);
        // Header + blank + TOTAL line with Rp0.
        assert_eq!(rows.len(), 3);
        assert!(rows[2].contains("TOTAL"));
        assert!(rows[2].contains("Rp0"));
    }
}
