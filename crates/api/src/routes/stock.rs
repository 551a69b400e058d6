//! Stock state, summary, and discrepancy routes.
//!
//! Every endpoint here recomputes from the committed movement log; there is
//! no cached balance to invalidate.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use gazstock_core::ledger::LedgerKey;
use gazstock_db::repositories::StockRepository;
use gazstock_shared::types::{BottleType, StockCategory, StockClient, StockSite};

use crate::AppState;

use super::stock_error_response;

/// Creates the stock routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stock/states", get(list_states))
        .route("/stock/states/current", get(current_state))
        .route("/stock/summary", get(stock_summary))
        .route("/stock/discrepancies", get(list_discrepancies))
        .route("/stock/reconcile", post(reconcile))
}

/// Default discrepancy threshold, in bottles.
const DEFAULT_THRESHOLD: Decimal = Decimal::TEN;

// ============================================================================
// Request types
// ============================================================================

/// Query parameters for one partition's consolidated state.
#[derive(Debug, Deserialize)]
pub struct CurrentStateQuery {
    /// Stock category.
    pub category: StockCategory,
    /// Plant site.
    pub site: StockSite,
    /// Bottle format.
    pub bottle_type: BottleType,
    /// Client attribution; absent aggregates every client of the line.
    pub client: Option<StockClient>,
}

/// Query parameters for the period summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Inclusive window start (YYYY-MM-DD).
    pub start_date: Option<NaiveDate>,
    /// Inclusive window end (YYYY-MM-DD).
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for the discrepancy listing.
#[derive(Debug, Deserialize)]
pub struct DiscrepancyQuery {
    /// Minimum absolute ecart to flag (default 10).
    pub threshold: Option<Decimal>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/stock/states` - One consolidated state per partition in the log.
async fn list_states(State(state): State<AppState>) -> impl IntoResponse {
    let repo = StockRepository::new((*state.db).clone());

    match repo.all_states().await {
        Ok(states) => (StatusCode::OK, Json(json!({ "states": states }))).into_response(),
        Err(err) => stock_error_response(err),
    }
}

/// GET `/stock/states/current` - Consolidated state of one partition.
async fn current_state(
    State(state): State<AppState>,
    Query(query): Query<CurrentStateQuery>,
) -> impl IntoResponse {
    let key = LedgerKey {
        category: query.category,
        site: query.site,
        bottle_type: query.bottle_type,
        client: query.client,
    };

    let repo = StockRepository::new((*state.db).clone());
    match repo.consolidated_state(&key).await {
        Ok(current) => (StatusCode::OK, Json(json!({ "state": current }))).into_response(),
        Err(err) => stock_error_response(err),
    }
}

/// GET `/stock/summary` - Windowed flow totals plus current balances.
async fn stock_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let repo = StockRepository::new((*state.db).clone());

    match repo.summary(query.start_date, query.end_date).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => stock_error_response(err),
    }
}

/// GET `/stock/discrepancies` - Partitions whose count variance is at or
/// above the threshold.
async fn list_discrepancies(
    State(state): State<AppState>,
    Query(query): Query<DiscrepancyQuery>,
) -> impl IntoResponse {
    let threshold = query.threshold.unwrap_or(DEFAULT_THRESHOLD);

    let repo = StockRepository::new((*state.db).clone());
    match repo.significant_discrepancies(threshold).await {
        Ok(states) => (
            StatusCode::OK,
            Json(json!({ "threshold": threshold, "discrepancies": states })),
        )
            .into_response(),
        Err(err) => stock_error_response(err),
    }
}

/// POST `/stock/reconcile` - Sweep for one-directional mirror links.
async fn reconcile(State(state): State<AppState>) -> impl IntoResponse {
    let repo = StockRepository::new((*state.db).clone());

    match repo.reconcile_links().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => stock_error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_threshold_is_ten_bottles() {
        assert_eq!(DEFAULT_THRESHOLD, dec!(10));
    }
}
