//! API route definitions.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use gazstock_db::repositories::StockError;
use gazstock_shared::AppError;

use crate::AppState;

pub mod health;
pub mod movements;
pub mod stock;

/// Creates the API router with all routes.
pub fn api_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .merge(health::routes())
        .merge(movements::routes())
        .merge(stock::routes())
}

/// Maps a shared application error to a JSON response.
pub(crate) fn app_error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

/// Maps a stock repository error to a JSON response.
///
/// The mirror-write failure gets its own shape: the primary movement is
/// already committed, and the caller needs its id to reconcile or retry.
pub(crate) fn stock_error_response(err: StockError) -> Response {
    match err {
        StockError::MirrorWrite { primary_id, source } => {
            error!(
                movement_id = %primary_id,
                error = %source,
                "mirror write failed after primary commit"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "MIRROR_WRITE_FAILED",
                    "message":
                        "The movement was saved but its mirror could not be created; retry or reconcile",
                    "movement_id": primary_id,
                })),
            )
                .into_response()
        }
        StockError::Validation(err) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": err.error_code(),
                "message": err.to_string(),
            })),
        )
            .into_response(),
        other => {
            let app: AppError = other.into();
            if app.status_code() >= 500 {
                error!(error = %app, "request failed");
            }
            app_error_response(&app)
        }
    }
}
