//! Reporting routes: dashboard, profit-and-loss and the stock report.
//! Pure read side; the math lives in gudang-core, the queries in
//! gudang-db.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use gudang_core::reports::{DashboardSummary, ProfitLossReport, StockReport};

use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, Envelope};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Accepts either RFC 3339 or a plain `YYYY-MM-DD`; a plain date snaps
/// to the start or end of that day so the window stays inclusive.
pub(crate) fn parse_date_param(raw: &str, end_of_day: bool) -> ApiResult<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("invalid date '{raw}'")))?;
    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default()
    } else {
        NaiveTime::default()
    };

    Ok(DateTime::from_naive_utc_and_offset(date.and_time(time), Utc))
}

impl WindowQuery {
    pub(crate) fn resolve(&self) -> ApiResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
        let start = self
            .start_date
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| parse_date_param(s, false))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| parse_date_param(s, true))
            .transpose()?;
        Ok((start, end))
    }
}

/// GET /api/reports/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<DashboardSummary>>> {
    let summary = state.db.reports().dashboard().await?;
    Ok(ok(summary))
}

/// GET /api/reports/profit-loss?startDate=&endDate=
pub async fn profit_loss(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<Envelope<ProfitLossReport>>> {
    let (start, end) = query.resolve()?;
    let report = state.db.reports().profit_loss(start, end).await?;
    Ok(ok(report))
}

/// GET /api/reports/stock
pub async fn stock(State(state): State<AppState>) -> ApiResult<Json<Envelope<StockReport>>> {
    let report = state.db.reports().stock_report().await?;
    Ok(ok(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_plain_date_snaps_to_day_bounds() {
        let start = parse_date_param("2026-03-01", false).unwrap();
        assert_eq!(start.hour(), 0);
        assert_eq!(start.minute(), 0);

        let end = parse_date_param("2026-03-01", true).unwrap();
        assert_eq!(end.hour(), 23);
        assert_eq!(end.second(), 59);
    }

    #[test]
    fn test_rfc3339_passes_through() {
        let parsed = parse_date_param("2026-03-01T10:30:00Z", false).unwrap();
        assert_eq!(parsed.hour(), 10);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_date_param("not-a-date", false).is_err());
        assert!(parse_date_param("03/01/2026", false).is_err());
    }
}
