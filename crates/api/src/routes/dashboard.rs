//! Dashboard summary route.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::routes::{bad_request, error_response};
use aperture_core::dashboard::ReportWindow;
use aperture_db::repositories::dashboard::DashboardRepository;

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard_summary))
}

/// Query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Reporting period; defaults to `this_month`.
    pub period: Option<String>,
    /// Custom window start (requires `period=custom`).
    pub start: Option<NaiveDate>,
    /// Custom window end (requires `period=custom`).
    pub end: Option<NaiveDate>,
}

/// Resolves the query into a reporting window.
fn resolve_window(query: &DashboardQuery) -> Result<ReportWindow, &'static str> {
    match query.period.as_deref() {
        None | Some("this_month") => Ok(ReportWindow::ThisMonth),
        Some("last_month") => Ok(ReportWindow::LastMonth),
        Some("this_quarter") => Ok(ReportWindow::ThisQuarter),
        Some("this_year") => Ok(ReportWindow::ThisYear),
        Some("last_year") => Ok(ReportWindow::LastYear),
        Some("custom") => match (query.start, query.end) {
            (Some(start), Some(end)) if start <= end => {
                Ok(ReportWindow::Custom { start, end })
            }
            (Some(_), Some(_)) => Err("Custom window start must not be after its end"),
            _ => Err("Custom windows need both start and end dates"),
        },
        Some(_) => Err("Unknown reporting period"),
    }
}

/// GET `/dashboard` - Aggregated view over one reporting window.
async fn dashboard_summary(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let window = match resolve_window(&query) {
        Ok(window) => window,
        Err(message) => return bad_request("INVALID_WINDOW", message),
    };

    let repo = DashboardRepository::new(state.db.clone());
    match repo.summary(window).await {
        Ok(summary) => (StatusCode::OK, Json(json!({ "dashboard": summary }))).into_response(),
        Err(err) => {
            error!(error = %err, "dashboard aggregation failed");
            error_response(err.status_code(), err.error_code(), &err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn query(period: Option<&str>, start: Option<&str>, end: Option<&str>) -> DashboardQuery {
        let parse = |s: Option<&str>| s.map(|s| s.parse().unwrap());
        DashboardQuery {
            period: period.map(ToString::to_string),
            start: parse(start),
            end: parse(end),
        }
    }

    #[rstest]
    #[case(None, ReportWindow::ThisMonth)]
    #[case(Some("this_month"), ReportWindow::ThisMonth)]
    #[case(Some("last_month"), ReportWindow::LastMonth)]
    #[case(Some("this_quarter"), ReportWindow::ThisQuarter)]
    #[case(Some("this_year"), ReportWindow::ThisYear)]
    #[case(Some("last_year"), ReportWindow::LastYear)]
    fn test_named_periods(#[case] period: Option<&str>, #[case] expected: ReportWindow) {
        assert_eq!(resolve_window(&query(period, None, None)).unwrap(), expected);
    }

    #[test]
    fn test_custom_period_needs_both_bounds() {
        assert!(resolve_window(&query(Some("custom"), Some("2026-08-01"), None)).is_err());
        assert!(resolve_window(&query(Some("custom"), None, None)).is_err());
    }

    #[test]
    fn test_custom_period_rejects_inverted_bounds() {
        assert!(
            resolve_window(&query(Some("custom"), Some("2026-08-31"), Some("2026-08-01")))
                .is_err()
        );
    }

    #[test]
    fn test_custom_period_parses() {
        let window =
            resolve_window(&query(Some("custom"), Some("2026-08-01"), Some("2026-08-31")))
                .unwrap();
        assert_eq!(
            window,
            ReportWindow::Custom {
                start: "2026-08-01".parse().unwrap(),
                end: "2026-08-31".parse().unwrap(),
            }
        );
    }

    #[test]
    fn test_unknown_period_rejected() {
        assert!(resolve_window(&query(Some("fortnight"), None, None)).is_err());
    }
}
