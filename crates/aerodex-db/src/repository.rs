//! Airport repository for PostgreSQL.
//!
//! The write path (existence probe and insert) always runs inside a
//! [`PgUnitOfWork`] handed out by the repository, so a reconciliation run
//! commits or rolls back as a whole. Dropping an uncommitted unit-of-work rolls
//! the transaction back.
//!
//! # Testing
//!
//! Unit tests cover row conversion only. The queries need a live PostgreSQL
//! instance with the migrations applied.

use aerodex_core::error::AppError;
use aerodex_core::models::{Airport, AirportStats, FacilityType, NewAirport, Ownership, UseType};
use aerodex_core::reconciler::{ExistenceProber, PersistenceGateway, UnitOfWork, UnitOfWorkFactory};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Pool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

/// Column list for SELECT and RETURNING clauses. Must remain a const literal
/// since `format!()` bypasses sqlx compile-time validation.
const AIRPORT_COLUMNS: &str = "id, icao_code, site_number, faa_code, iata_code, name, \
    facility_type, active, country, state, state_full, county, city, ownership, use_type, \
    manager, manager_phone, latitude, latitude_sec, longitude, longitude_sec, elevation, \
    control_tower, unicom, ctaf, effective_date, created_at, updated_at";

/// Default row cap for [`AirportRepository::list_all`].
const DEFAULT_LIST_LIMIT: usize = 10_000;

/// `LIMIT` bind value. Postgres takes a signed bigint, so larger caps saturate.
fn limit_param(limit: Option<usize>) -> i64 {
    i64::try_from(limit.unwrap_or(DEFAULT_LIST_LIMIT)).unwrap_or(i64::MAX)
}

/// Repository for airport persistence in PostgreSQL.
///
/// # Examples
///
/// ```no_run
/// use sqlx::postgres::PgPoolOptions;
/// use aerodex_db::AirportRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = PgPoolOptions::new()
///     .max_connections(5)
///     .connect("postgresql://localhost/aerodex")
///     .await?;
///
/// let repo = AirportRepository::new(pool);
/// let stored = repo.find_by_icao("KSEA").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AirportRepository {
    pool: Pool<Postgres>,
}

/// An open transaction on the airport store.
///
/// Committing is explicit; dropping it without [`UnitOfWork::commit`] rolls
/// every statement issued through it back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl AirportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Retrieves an airport by ICAO code.
    pub async fn find_by_icao(&self, icao_code: &str) -> Result<Option<Airport>, AppError> {
        let query = format!("SELECT {} FROM airports WHERE icao_code = $1", AIRPORT_COLUMNS);
        let row = sqlx::query_as::<_, AirportRow>(&query)
            .bind(icao_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(row.map(Airport::from))
    }

    /// Lists airports, most recently updated first.
    pub async fn list_all(&self, limit: Option<usize>) -> Result<Vec<Airport>, AppError> {
        let limit_val = limit_param(limit);

        let query = format!(
            "SELECT {} FROM airports ORDER BY updated_at DESC, icao_code LIMIT $1",
            AIRPORT_COLUMNS
        );
        let rows = sqlx::query_as::<_, AirportRow>(&query)
            .bind(limit_val)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(rows.into_iter().map(Airport::from).collect())
    }

    /// Returns aggregated directory statistics.
    pub async fn get_stats(&self) -> Result<AirportStats, AppError> {
        let row: StatsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE active) as active,
                COUNT(*) FILTER (WHERE control_tower) as towered,
                MAX(updated_at) as last_update
            FROM airports
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(AirportStats {
            total_airports: row.total.unwrap_or(0),
            active_airports: row.active.unwrap_or(0),
            with_control_tower: row.towered.unwrap_or(0),
            last_update: row.last_update,
        })
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await.map_err(AppError::DatabaseError)
    }
}

#[async_trait]
impl UnitOfWorkFactory for AirportRepository {
    type Work = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork, AppError> {
        let tx = self.pool.begin().await.map_err(AppError::DatabaseError)?;
        Ok(PgUnitOfWork { tx })
    }
}

#[async_trait]
impl ExistenceProber<PgUnitOfWork> for AirportRepository {
    async fn exists(&self, work: &mut PgUnitOfWork, icao_code: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM airports WHERE icao_code = $1)")
                .bind(icao_code)
                .fetch_one(&mut *work.tx)
                .await
                .map_err(AppError::DatabaseError)?;

        Ok(exists)
    }
}

#[async_trait]
impl PersistenceGateway<PgUnitOfWork> for AirportRepository {
    async fn insert(
        &self,
        work: &mut PgUnitOfWork,
        airport: &NewAirport,
    ) -> Result<Airport, AppError> {
        let query = format!(
            r#"
            INSERT INTO airports (
                icao_code, site_number, faa_code, iata_code, name,
                facility_type, active, country, state, state_full,
                county, city, ownership, use_type, manager,
                manager_phone, latitude, latitude_sec, longitude, longitude_sec,
                elevation, control_tower, unicom, ctaf, effective_date
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                $21, $22, $23, $24, $25
            )
            RETURNING {}
            "#,
            AIRPORT_COLUMNS
        );

        let row = sqlx::query_as::<_, AirportRow>(&query)
            .bind(&airport.icao_code)
            .bind(&airport.site_number)
            .bind(&airport.faa_code)
            .bind(&airport.iata_code)
            .bind(&airport.name)
            .bind(airport.facility_type.map(|t| t.as_str()))
            .bind(airport.active)
            .bind(&airport.country)
            .bind(&airport.state)
            .bind(&airport.state_full)
            .bind(&airport.county)
            .bind(&airport.city)
            .bind(airport.ownership.map(|o| o.as_str()))
            .bind(airport.use_type.map(|u| u.as_str()))
            .bind(&airport.manager)
            .bind(&airport.manager_phone)
            .bind(&airport.latitude)
            .bind(&airport.latitude_sec)
            .bind(&airport.longitude)
            .bind(&airport.longitude_sec)
            .bind(airport.elevation)
            .bind(airport.control_tower)
            .bind(&airport.unicom)
            .bind(&airport.ctaf)
            .bind(airport.effective_date)
            .fetch_one(&mut *work.tx)
            .await
            .map_err(AppError::DatabaseError)?;

        debug!(icao_code = %row.icao_code, id = %row.id, "Inserted airport row");
        Ok(Airport::from(row))
    }
}

/// Raw `airports` row; enum columns are stored as lowercase text.
#[derive(Debug, Clone, sqlx::FromRow)]
struct AirportRow {
    id: Uuid,
    icao_code: String,
    site_number: Option<String>,
    faa_code: Option<String>,
    iata_code: Option<String>,
    name: Option<String>,
    facility_type: Option<String>,
    active: Option<bool>,
    country: Option<String>,
    state: Option<String>,
    state_full: Option<String>,
    county: Option<String>,
    city: Option<String>,
    ownership: Option<String>,
    use_type: Option<String>,
    manager: Option<String>,
    manager_phone: Option<String>,
    latitude: Option<String>,
    latitude_sec: Option<String>,
    longitude: Option<String>,
    longitude_sec: Option<String>,
    elevation: Option<i64>,
    control_tower: Option<bool>,
    unicom: Option<String>,
    ctaf: Option<String>,
    effective_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AirportRow> for Airport {
    fn from(row: AirportRow) -> Self {
        Airport {
            id: row.id,
            icao_code: row.icao_code,
            site_number: row.site_number,
            faa_code: row.faa_code,
            iata_code: row.iata_code,
            name: row.name,
            facility_type: row.facility_type.as_deref().and_then(FacilityType::parse),
            active: row.active,
            country: row.country,
            state: row.state,
            state_full: row.state_full,
            county: row.county,
            city: row.city,
            ownership: row.ownership.as_deref().and_then(Ownership::parse),
            use_type: row.use_type.as_deref().and_then(UseType::parse),
            manager: row.manager,
            manager_phone: row.manager_phone,
            latitude: row.latitude,
            latitude_sec: row.latitude_sec,
            longitude: row.longitude,
            longitude_sec: row.longitude_sec,
            elevation: row.elevation,
            control_tower: row.control_tower,
            unicom: row.unicom,
            ctaf: row.ctaf,
            effective_date: row.effective_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Helper struct for deserializing stats query results
#[derive(sqlx::FromRow)]
struct StatsRow {
    total: Option<i64>,
    active: Option<i64>,
    towered: Option<i64>,
    last_update: Option<DateTime<Utc>>,
}
