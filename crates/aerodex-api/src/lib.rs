//! Aerodex API - HTTP surface for reconciliation runs and airport lookups.
//!
//! ```text
//! GET  /health               liveness probe
//! POST /sync/airports        run one reconciliation over a batch of codes
//! GET  /airports/{icao}      read a stored airport
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use router::{build_app_router, serve};
pub use state::{AirportLookup, AppState};
