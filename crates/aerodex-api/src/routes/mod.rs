pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the reconciliation and lookup route tree.
///
/// ```text
/// POST /sync/airports        reconcile a batch of codes
/// GET  /airports/{icao}      read a stored airport
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/sync/airports", post(handlers::sync::sync_airports))
        .route("/airports/{icao}", get(handlers::airports::get_airport))
}
