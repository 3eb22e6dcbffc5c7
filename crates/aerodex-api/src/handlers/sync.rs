//! Handler for triggering a reconciliation run.

use aerodex_core::sync::{SyncAirportsRequest, SyncOutcome, SyncStats};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /sync/airports
///
/// Reconciles the requested codes against the store and returns one outcome
/// per code, in request order.
pub async fn sync_airports(
    State(state): State<AppState>,
    payload: Result<Json<SyncAirportsRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<SyncOutcome>>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let outcomes = state.sync.sync_airports(&request.icao_codes).await?;

    let stats = SyncStats::from_outcomes(&outcomes);
    tracing::info!(
        skipped = stats.skipped,
        inserted = stats.inserted,
        not_found = stats.not_found,
        "Sync request completed"
    );

    Ok(Json(outcomes))
}
