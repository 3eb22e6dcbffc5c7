use aerodex_core::error::AppError;
use aerodex_core::models::Airport;
use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /airports/{icao}
pub async fn get_airport(
    State(state): State<AppState>,
    Path(icao): Path<String>,
) -> ApiResult<Json<Airport>> {
    let airport = state
        .airports
        .find_by_icao(&icao)
        .await?
        .ok_or(AppError::AirportNotFound(icao))?;

    Ok(Json(airport))
}
