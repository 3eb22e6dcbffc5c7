//! Airport domain model.
//!
//! [`Airport`] is a stored row; [`NewAirport`] is the normalized input the
//! reconciler hands to the store. Every optional attribute is an `Option` so an
//! absent value never collapses into a zero value (an unparsable elevation is
//! `None`, a sea-level one is `Some(0)`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Facility classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityType {
    Airport,
    Heliport,
}

impl FacilityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityType::Airport => "airport",
            FacilityType::Heliport => "heliport",
        }
    }

    /// Matches free text against the known vocabulary, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use aerodex_core::models::FacilityType;
    ///
    /// assert_eq!(FacilityType::parse("AIRPORT"), Some(FacilityType::Airport));
    /// assert_eq!(FacilityType::parse("seaplane base"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "airport" => Some(FacilityType::Airport),
            "heliport" => Some(FacilityType::Heliport),
            _ => None,
        }
    }
}

/// Who owns the facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    Public,
    Private,
}

impl Ownership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ownership::Public => "public",
            Ownership::Private => "private",
        }
    }

    /// Parses the stored (lowercase) representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Ownership::Public),
            "private" => Some(Ownership::Private),
            _ => None,
        }
    }

    /// Maps the registry's two-letter code: `PU`, `PR`, anything else is unset.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PU" => Some(Ownership::Public),
            "PR" => Some(Ownership::Private),
            _ => None,
        }
    }
}

/// Whether the facility is open for public use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseType {
    Public,
    Private,
}

impl UseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UseType::Public => "public",
            UseType::Private => "private",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(UseType::Public),
            "private" => Some(UseType::Private),
            _ => None,
        }
    }

    /// Maps the registry's two-letter code: `PU`, `PR`, anything else is unset.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PU" => Some(UseType::Public),
            "PR" => Some(UseType::Private),
            _ => None,
        }
    }
}

/// A stored airport record.
///
/// `id`, `created_at` and `updated_at` are assigned by the store and never
/// supplied by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: Uuid,
    pub icao_code: String,
    pub site_number: Option<String>,
    pub faa_code: Option<String>,
    pub iata_code: Option<String>,
    pub name: Option<String>,
    pub facility_type: Option<FacilityType>,
    pub active: Option<bool>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub state_full: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub ownership: Option<Ownership>,
    pub use_type: Option<UseType>,
    pub manager: Option<String>,
    pub manager_phone: Option<String>,
    pub latitude: Option<String>,
    pub latitude_sec: Option<String>,
    pub longitude: Option<String>,
    pub longitude_sec: Option<String>,
    pub elevation: Option<i64>,
    pub control_tower: Option<bool>,
    pub unicom: Option<String>,
    pub ctaf: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized input for an airport about to be inserted.
///
/// The `Default` value is the explicit "no upstream data" marker: the
/// upstream fetcher returns it for codes the registry knows nothing about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewAirport {
    pub icao_code: String,
    pub site_number: Option<String>,
    pub faa_code: Option<String>,
    pub iata_code: Option<String>,
    pub name: Option<String>,
    pub facility_type: Option<FacilityType>,
    pub active: Option<bool>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub state_full: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub ownership: Option<Ownership>,
    pub use_type: Option<UseType>,
    pub manager: Option<String>,
    pub manager_phone: Option<String>,
    pub latitude: Option<String>,
    pub latitude_sec: Option<String>,
    pub longitude: Option<String>,
    pub longitude_sec: Option<String>,
    pub elevation: Option<i64>,
    pub control_tower: Option<bool>,
    pub unicom: Option<String>,
    pub ctaf: Option<String>,
    pub effective_date: Option<NaiveDate>,
}

impl NewAirport {
    /// True when this is the "no upstream data" marker.
    ///
    /// # Examples
    ///
    /// ```
    /// use aerodex_core::models::NewAirport;
    ///
    /// assert!(NewAirport::default().is_empty());
    ///
    /// let found = NewAirport {
    ///     icao_code: "KSEA".to_string(),
    ///     ..Default::default()
    /// };
    /// assert!(!found.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        *self == NewAirport::default()
    }
}

/// Aggregated store statistics.
#[derive(Debug, Clone, Serialize)]
pub struct AirportStats {
    pub total_airports: i64,
    pub active_airports: i64,
    pub with_control_tower: i64,
    pub last_update: Option<DateTime<Utc>>,
}
