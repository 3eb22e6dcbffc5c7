use std::sync::Arc;

use aerodex_core::error::AppError;
use aerodex_core::models::Airport;
use aerodex_core::reconciler::AirportSync;
use aerodex_db::AirportRepository;
use async_trait::async_trait;

/// Read access to stored airports, as needed by the lookup endpoint.
#[async_trait]
pub trait AirportLookup: Send + Sync {
    async fn find_by_icao(&self, icao_code: &str) -> Result<Option<Airport>, AppError>;
}

#[async_trait]
impl AirportLookup for AirportRepository {
    async fn find_by_icao(&self, icao_code: &str) -> Result<Option<Airport>, AppError> {
        AirportRepository::find_by_icao(self, icao_code).await
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Runs reconciliations; each call opens its own unit-of-work.
    pub sync: Arc<dyn AirportSync>,
    /// Reads stored airports.
    pub airports: Arc<dyn AirportLookup>,
}
