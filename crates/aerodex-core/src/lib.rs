//! Aerodex Core - Domain types, error handling, configuration and the
//! reconciliation engine.

pub mod config;
pub mod error;
pub mod models;
pub mod reconciler;
pub mod sync;

pub use config::{default_config_path, load_config, DbConfig, FileConfig, HttpConfig};
pub use error::{AppError, ErrorKind};
pub use models::{Airport, AirportStats, FacilityType, NewAirport, Ownership, UseType};
pub use reconciler::{
    AirportSync, ExistenceProber, PersistenceGateway, Reconciler, UnitOfWork, UnitOfWorkFactory,
    UpstreamFetcher,
};
pub use sync::{
    validate_icao_codes, SyncAirportsRequest, SyncOutcome, SyncStats, SyncStatus,
};
