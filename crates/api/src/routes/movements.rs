//! Movement log routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use gazstock_core::ledger::NewMovement;
use gazstock_db::entities::stock_movements;
use gazstock_db::repositories::{MovementFilter, MovementUpdate, StockRepository};
use gazstock_shared::types::{
    BottleType, MovementType, PageRequest, PageResponse, StockCategory, StockClient, StockSite,
};

use crate::AppState;
use crate::middleware::Actor;

use super::stock_error_response;

/// Creates the movement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movements", get(list_movements))
        .route("/movements", post(create_movement))
        .route("/movements/{id}", patch(update_movement))
        .route("/movements/{id}", delete(delete_movement))
}

const MAX_PER_PAGE: u64 = 100;

// ============================================================================
// Request types
// ============================================================================

/// Query parameters for listing movements.
#[derive(Debug, Deserialize)]
pub struct ListMovementsQuery {
    /// Filter by stock category.
    pub category: Option<StockCategory>,
    /// Filter by plant site.
    pub site: Option<StockSite>,
    /// Filter by bottle format.
    pub bottle_type: Option<BottleType>,
    /// Filter by client; pass `none` to select unattributed rows.
    pub client: Option<String>,
    /// Filter by movement kind.
    pub movement_type: Option<MovementType>,
    /// Inclusive lower date bound (YYYY-MM-DD).
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound (YYYY-MM-DD).
    pub end_date: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size (default 30, max 100).
    pub per_page: Option<u64>,
}

/// Request body for partially updating a movement.
#[derive(Debug, Deserialize)]
pub struct UpdateMovementRequest {
    /// New event date.
    pub date: Option<NaiveDate>,
    /// New movement kind.
    pub movement_type: Option<MovementType>,
    /// New quantity.
    pub quantity: Option<Decimal>,
    /// New counted quantity.
    pub stock_reel: Option<Decimal>,
    /// New delivery note reference.
    pub bon_numero: Option<String>,
    /// New variance explanation.
    pub justification_ecart: Option<String>,
}

/// Query parameters for deleting a movement.
#[derive(Debug, Deserialize)]
pub struct DeleteMovementQuery {
    /// Whether to delete the linked mirror too (default true).
    pub cascade: Option<bool>,
}

/// Parses the tri-state client filter: absent, `none`, or a client value.
pub(crate) fn parse_client_filter(
    raw: Option<&str>,
) -> Result<Option<Option<StockClient>>, String> {
    match raw {
        None => Ok(None),
        Some("none") => Ok(Some(None)),
        Some(value) => StockClient::from_str(value)
            .map(|client| Some(Some(client)))
            .map_err(|err| err.to_string()),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/movements` - Paginated movement history, newest first.
async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<ListMovementsQuery>,
) -> impl IntoResponse {
    let client = match parse_client_filter(query.client.as_deref()) {
        Ok(client) => client,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "INVALID_CLIENT", "message": message })),
            )
                .into_response();
        }
    };

    let filter = MovementFilter {
        category: query.category,
        site: query.site,
        bottle_type: query.bottle_type,
        client,
        movement_type: query.movement_type,
        date_from: query.start_date,
        date_to: query.end_date,
    };

    let page = PageRequest {
        page: query.page.unwrap_or(1).max(1),
        per_page: query.per_page.unwrap_or(30).clamp(1, MAX_PER_PAGE),
    };

    let repo = StockRepository::new((*state.db).clone());
    match repo.movements().query_paginated(&filter, page).await {
        Ok((rows, total)) => {
            let body: PageResponse<stock_movements::Model> = PageResponse::new(rows, page, total);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => stock_error_response(err.into()),
    }
}

/// POST `/movements` - Validate, snapshot, and persist a movement.
///
/// Tracked inter-warehouse transfers come back with the id of the mirror
/// that was created alongside.
async fn create_movement(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<NewMovement>,
) -> impl IntoResponse {
    let repo = StockRepository::new((*state.db).clone());

    match repo.save_movement(payload, actor.name()).await {
        Ok(saved) => (
            StatusCode::CREATED,
            Json(json!({
                "movement": saved.movement,
                "mirror_id": saved.mirror.as_ref().map(|m| m.id),
            })),
        )
            .into_response(),
        Err(err) => stock_error_response(err),
    }
}

/// PATCH `/movements/{id}` - Partial update.
///
/// Quantity edits do not propagate to an existing mirror; correcting a
/// transfer after the fact means touching both rows.
async fn update_movement(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovementRequest>,
) -> impl IntoResponse {
    let update = MovementUpdate {
        date: payload.date,
        movement_type: payload.movement_type,
        quantity: payload.quantity,
        stock_reel: payload.stock_reel,
        bon_numero: payload.bon_numero,
        justification_ecart: payload.justification_ecart,
        ..MovementUpdate::default()
    };

    let repo = StockRepository::new((*state.db).clone());
    match repo.update_movement(id, update, actor.name()).await {
        Ok(movement) => (StatusCode::OK, Json(json!({ "movement": movement }))).into_response(),
        Err(err) => stock_error_response(err),
    }
}

/// DELETE `/movements/{id}` - Delete a movement, cascading over its mirror
/// unless `cascade=false`.
async fn delete_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteMovementQuery>,
) -> impl IntoResponse {
    let cascade = query.cascade.unwrap_or(true);

    let repo = StockRepository::new((*state.db).clone());
    match repo.delete_movement(id, cascade).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => stock_error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some("none"), Some(None))]
    #[case(Some("vivo_energy"), Some(Some(StockClient::VivoEnergy)))]
    #[case(Some("petro_ivoire"), Some(Some(StockClient::PetroIvoire)))]
    fn test_client_filter_tri_state(
        #[case] raw: Option<&str>,
        #[case] expected: Option<Option<StockClient>>,
    ) {
        assert_eq!(parse_client_filter(raw).unwrap(), expected);
    }

    #[test]
    fn test_client_filter_rejects_unknown_value() {
        let err = parse_client_filter(Some("total")).unwrap_err();
        assert!(err.contains("total"));
    }
}
