//! Reconciliation engine.
//!
//! A run takes an ordered batch of facility codes and, inside one unit of
//! work:
//!
//! 1. probes the store for every code, in input order, marking present codes
//!    [`SyncStatus::Skipped`](crate::sync::SyncStatus::Skipped);
//! 2. asks the upstream registry for all remaining codes in a single call;
//! 3. persists each fetched record, or marks the code `NotFound` when the
//!    registry returned nothing for it;
//! 4. commits.
//!
//! Any error after validation aborts the whole run. The unit of work is
//! dropped without being committed, which rolls it back, and the caller gets
//! the error instead of a partial outcome list.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::models::{Airport, NewAirport};
use crate::sync::{validate_icao_codes, SyncOutcome, SyncStats};

/// Transactional scope of one run.
///
/// Dropping a unit of work without calling [`UnitOfWork::commit`] must discard
/// everything written through it.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn commit(self) -> Result<(), AppError>;
}

/// Opens a fresh [`UnitOfWork`] for each run.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    type Work: UnitOfWork;

    async fn begin(&self) -> Result<Self::Work, AppError>;
}

/// Answers whether a code is already stored, as seen from inside `work`.
#[async_trait]
pub trait ExistenceProber<W: Send>: Send + Sync {
    async fn exists(&self, work: &mut W, icao_code: &str) -> Result<bool, AppError>;
}

/// Inserts a normalized record and returns the stored row.
#[async_trait]
pub trait PersistenceGateway<W: Send>: Send + Sync {
    async fn insert(&self, work: &mut W, airport: &NewAirport) -> Result<Airport, AppError>;
}

/// Retrieves records for a batch of codes from the upstream registry.
///
/// Implementations make exactly one upstream call per invocation and return
/// an entry for every requested code; codes the registry has no data for map
/// to [`NewAirport::default`].
#[async_trait]
pub trait UpstreamFetcher: Send + Sync {
    async fn fetch(&self, icao_codes: &[String]) -> Result<HashMap<String, NewAirport>, AppError>;
}

/// Object-safe entry point used by the HTTP layer.
#[async_trait]
pub trait AirportSync: Send + Sync {
    async fn sync_airports(&self, icao_codes: &[String]) -> Result<Vec<SyncOutcome>, AppError>;
}

/// Orchestrates a reconciliation run over a store and an upstream fetcher.
///
/// `S` plays the existence prober, the persistence gateway and the unit of
/// work factory; production wires the PostgreSQL repository in, tests wire
/// in-memory fakes.
#[derive(Clone)]
pub struct Reconciler<S, F> {
    store: S,
    fetcher: F,
}

impl<S, F> Reconciler<S, F>
where
    S: UnitOfWorkFactory
        + ExistenceProber<<S as UnitOfWorkFactory>::Work>
        + PersistenceGateway<<S as UnitOfWorkFactory>::Work>,
    F: UpstreamFetcher,
{
    pub fn new(store: S, fetcher: F) -> Self {
        Self { store, fetcher }
    }

    /// Runs one reconciliation over `icao_codes`.
    ///
    /// Returns exactly one outcome per input code, in input order.
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` if the batch is empty or holds a blank code;
    ///   no I/O is performed.
    /// - Any error from the store or the fetcher; the unit of work is rolled
    ///   back and no outcomes are returned.
    pub async fn run(&self, icao_codes: &[String]) -> Result<Vec<SyncOutcome>, AppError> {
        if let Err(e) = validate_icao_codes(icao_codes) {
            warn!(error = %e, "Rejected sync request");
            return Err(e);
        }

        info!(codes = icao_codes.len(), "Starting airport sync");

        let mut work = self.store.begin().await?;

        // One slot per input position so skipped and fetched codes land back
        // in input order.
        let mut outcomes: Vec<Option<SyncOutcome>> = vec![None; icao_codes.len()];
        let mut pending: Vec<usize> = Vec::new();

        for (pos, code) in icao_codes.iter().enumerate() {
            if self.store.exists(&mut work, code).await? {
                debug!(icao_code = %code, "Already present, skipping");
                outcomes[pos] = Some(SyncOutcome::skipped(code));
            } else {
                debug!(icao_code = %code, "Not stored, queued for fetch");
                pending.push(pos);
            }
        }

        if !pending.is_empty() {
            let fetch_set: Vec<String> = pending.iter().map(|&pos| icao_codes[pos].clone()).collect();
            debug!(codes = ?fetch_set, "Fetching from upstream");

            let fetched = self
                .fetcher
                .fetch(&fetch_set)
                .await
                .inspect_err(|e| error!(error = %e, "Upstream fetch failed, aborting sync"))?;

            for &pos in &pending {
                let code = &icao_codes[pos];
                let outcome = match fetched.get(code) {
                    Some(input) if !input.is_empty() => {
                        let airport = self
                            .store
                            .insert(&mut work, input)
                            .await
                            .inspect_err(|e| {
                                error!(icao_code = %code, error = %e, "Insert failed, aborting sync")
                            })?;
                        debug!(icao_code = %code, id = %airport.id, "Inserted");
                        SyncOutcome::inserted(code, airport)
                    }
                    _ => {
                        warn!(icao_code = %code, "No data from upstream");
                        SyncOutcome::not_found(code)
                    }
                };
                outcomes[pos] = Some(outcome);
            }
        }

        work.commit().await?;

        let outcomes: Vec<SyncOutcome> = outcomes.into_iter().flatten().collect();
        let stats = SyncStats::from_outcomes(&outcomes);
        info!(
            skipped = stats.skipped,
            inserted = stats.inserted,
            not_found = stats.not_found,
            "Airport sync complete"
        );

        Ok(outcomes)
    }
}

#[async_trait]
impl<S, F> AirportSync for Reconciler<S, F>
where
    S: UnitOfWorkFactory
        + ExistenceProber<<S as UnitOfWorkFactory>::Work>
        + PersistenceGateway<<S as UnitOfWorkFactory>::Work>,
    F: UpstreamFetcher,
{
    async fn sync_airports(&self, icao_codes: &[String]) -> Result<Vec<SyncOutcome>, AppError> {
        self.run(icao_codes).await
    }
}
