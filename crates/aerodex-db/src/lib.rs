//! Aerodex DB - PostgreSQL persistence for the airport directory.
//!
//! - [`repository`] - the airport store, its transactional unit-of-work and
//!   read queries
//! - [`MIGRATOR`] - embedded schema migrations, applied with [`migrate`],
//!   reverted with [`rollback`] and inspected with [`migration_status`]

pub mod repository;

pub use repository::{AirportRepository, PgUnitOfWork};

use std::collections::HashMap;

use aerodex_core::error::AppError;
use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::{info, warn};

/// Schema migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// State of one embedded migration in a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub version: i64,
    pub description: String,
    pub applied: bool,
    /// Recorded but did not finish; needs manual intervention.
    pub dirty: bool,
}

/// Applies all pending migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.into()))?;
    info!("Database schema is up to date");
    Ok(())
}

/// Reverts every applied migration.
pub async fn rollback(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR
        .undo(pool, 0)
        .await
        .map_err(|e| AppError::DatabaseError(e.into()))?;
    warn!("All migrations rolled back");
    Ok(())
}

/// Lists the embedded migrations in version order, each marked applied or
/// pending against the database.
pub async fn migration_status(pool: &PgPool) -> Result<Vec<MigrationState>, AppError> {
    let tracked: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await
    .map_err(AppError::DatabaseError)?;

    let recorded: Vec<(i64, bool)> = if tracked {
        sqlx::query_as("SELECT version, success FROM _sqlx_migrations ORDER BY version")
            .fetch_all(pool)
            .await
            .map_err(AppError::DatabaseError)?
    } else {
        Vec::new()
    };

    let embedded = MIGRATOR
        .iter()
        .filter(|m| m.migration_type.is_up_migration())
        .map(|m| (m.version, m.description.to_string()));

    Ok(merge_status(embedded, &recorded))
}

/// Joins embedded migrations with the `(version, success)` rows recorded by
/// the migrator.
fn merge_status(
    embedded: impl IntoIterator<Item = (i64, String)>,
    recorded: &[(i64, bool)],
) -> Vec<MigrationState> {
    let recorded: HashMap<i64, bool> = recorded.iter().copied().collect();

    let mut states: Vec<MigrationState> = embedded
        .into_iter()
        .map(|(version, description)| {
            let success = recorded.get(&version).copied();
            MigrationState {
                version,
                description,
                applied: success == Some(true),
                dirty: success == Some(false),
            }
        })
        .collect();
    states.sort_by_key(|s| s.version);
    states
}
