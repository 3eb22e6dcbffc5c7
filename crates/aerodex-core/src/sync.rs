//! Reconciliation outcome types.
//!
//! This module holds the per-code report produced by a reconciliation run and
//! the pure helpers around it (request validation, statistics), decoupled from
//! I/O and from the orchestration in [`crate::reconciler`].

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Airport;

pub const MSG_SKIPPED: &str = "already present";
pub const MSG_INSERTED: &str = "persisted successfully";
pub const MSG_NOT_FOUND: &str = "no data from upstream";

/// Terminal state of a single facility code within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    /// Code already stored locally - upstream was not consulted for it
    Skipped,
    /// Fetched from upstream and persisted
    Inserted,
    /// Upstream returned no record for this code
    #[serde(rename = "Not Found")]
    NotFound,
}

/// Outcome for one input code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub icao_code: String,
    /// The stored record, only for [`SyncStatus::Inserted`].
    pub airport: Option<Airport>,
    pub status: SyncStatus,
    pub message: String,
}

impl SyncOutcome {
    pub fn skipped(icao_code: &str) -> Self {
        Self {
            icao_code: icao_code.to_string(),
            airport: None,
            status: SyncStatus::Skipped,
            message: MSG_SKIPPED.to_string(),
        }
    }

    pub fn inserted(icao_code: &str, airport: Airport) -> Self {
        Self {
            icao_code: icao_code.to_string(),
            airport: Some(airport),
            status: SyncStatus::Inserted,
            message: MSG_INSERTED.to_string(),
        }
    }

    pub fn not_found(icao_code: &str) -> Self {
        Self {
            icao_code: icao_code.to_string(),
            airport: None,
            status: SyncStatus::NotFound,
            message: MSG_NOT_FOUND.to_string(),
        }
    }
}

/// Request body for a reconciliation run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncAirportsRequest {
    pub icao_codes: Vec<String>,
}

/// Checks a batch before any I/O: at least one code, none of them blank.
///
/// A single bad code rejects the whole batch.
///
/// # Examples
///
/// ```
/// use aerodex_core::sync::validate_icao_codes;
///
/// assert!(validate_icao_codes(&["KJFK".to_string()]).is_ok());
/// assert!(validate_icao_codes(&[]).is_err());
/// assert!(validate_icao_codes(&["KJFK".to_string(), " ".to_string()]).is_err());
/// ```
pub fn validate_icao_codes(icao_codes: &[String]) -> Result<(), AppError> {
    if icao_codes.is_empty() {
        return Err(AppError::Validation(
            "icao_codes must contain at least one code".to_string(),
        ));
    }

    if let Some(pos) = icao_codes.iter().position(|c| c.trim().is_empty()) {
        return Err(AppError::Validation(format!(
            "icao_codes[{}] must not be empty",
            pos
        )));
    }

    Ok(())
}

/// Statistics for a reconciliation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    pub skipped: usize,
    pub inserted: usize,
    pub not_found: usize,
}

impl SyncStats {
    /// Creates a new empty stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a status, incrementing the appropriate counter.
    pub fn record(&mut self, status: SyncStatus) {
        match status {
            SyncStatus::Skipped => self.skipped += 1,
            SyncStatus::Inserted => self.inserted += 1,
            SyncStatus::NotFound => self.not_found += 1,
        }
    }

    /// Tallies a finished outcome list.
    pub fn from_outcomes(outcomes: &[SyncOutcome]) -> Self {
        let mut stats = Self::new();
        for outcome in outcomes {
            stats.record(outcome.status);
        }
        stats
    }

    /// Returns the total number of processed codes.
    pub fn total(&self) -> usize {
        self.skipped + self.inserted + self.not_found
    }
}
