use std::collections::HashMap;
use std::time::Duration;

use aerodex_core::config::HttpConfig;
use aerodex_core::error::AppError;
use aerodex_core::models::{FacilityType, NewAirport, Ownership, UseType};
use aerodex_core::reconciler::UpstreamFetcher;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, warn};
use url::Url;

/// Date format used by the registry's `effective_date` field.
const EFFECTIVE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Data Transfer Object for one airport as returned by the registry.
///
/// Every field is a string on the wire. Missing or `null` fields deserialize
/// as `None`; interpretation happens in [`AviationClient::into_new_airport`].
///
/// # Examples
///
/// ```
/// use aerodex_client::AviationAirport;
///
/// let json = r#"{
///     "site_number": "16517.*A",
///     "type": "AIRPORT",
///     "facility_name": "SEATTLE-TACOMA INTL",
///     "faa_ident": "SEA",
///     "icao_ident": "KSEA",
///     "status": "O",
///     "elevation": null
/// }"#;
///
/// let raw: AviationAirport = serde_json::from_str(json).unwrap();
/// assert_eq!(raw.icao_ident.as_deref(), Some("KSEA"));
/// assert!(raw.elevation.is_none());
/// assert!(raw.city.is_none());
/// ```
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AviationAirport {
    pub site_number: Option<String>,
    #[serde(rename = "type")]
    pub facility_type: Option<String>,
    pub facility_name: Option<String>,
    pub faa_ident: Option<String>,
    pub icao_ident: Option<String>,
    pub region: Option<String>,
    pub district_office: Option<String>,
    pub state: Option<String>,
    pub state_full: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub ownership: Option<String>,
    #[serde(rename = "use")]
    pub use_type: Option<String>,
    pub manager: Option<String>,
    pub manager_phone: Option<String>,
    pub latitude: Option<String>,
    pub latitude_sec: Option<String>,
    pub longitude: Option<String>,
    pub longitude_sec: Option<String>,
    pub elevation: Option<String>,
    pub magnetic_variation: Option<String>,
    pub tpa: Option<String>,
    pub vfr_sectional: Option<String>,
    pub notam_facility_ident: Option<String>,
    pub status: Option<String>,
    pub control_tower: Option<String>,
    pub unicom: Option<String>,
    pub ctaf: Option<String>,
    pub effective_date: Option<String>,
}

/// HTTP client for the upstream aviation registry.
///
/// One call to [`AviationClient::fetch_airports`] is one `GET
/// {base}/airports?apt=CODE1,CODE2,...` request. Failed requests are never
/// retried.
///
/// # Examples
///
/// ```no_run
/// use aerodex_client::AviationClient;
/// use aerodex_core::HttpConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AviationClient::new("https://api.aviationapi.com/v1", &HttpConfig::default())?;
/// let airports = client.fetch_airports(&["KSEA".to_string()]).await?;
/// println!("Got {} entries", airports.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AviationClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl AviationClient {
    /// Creates a client for the registry rooted at `base_url_str`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if the URL is invalid or cannot be a base.
    /// Returns `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new(base_url_str: &str, config: &HttpConfig) -> Result<Self, AppError> {
        let mut base_url =
            Url::parse(base_url_str).map_err(|_| AppError::InvalidUrl(base_url_str.to_string()))?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::InvalidUrl(base_url_str.to_string()));
        }

        // Without a trailing slash `join` would replace the last path segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent("Aerodex/0.1 (airport-sync)")
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
        })
    }

    /// Builds `{base}/airports?apt=CODE1,CODE2,...`.
    ///
    /// Commas are valid in a query string and are left as literal commas.
    fn airports_url(&self, icao_codes: &[String]) -> Result<Url, AppError> {
        let mut url = self
            .base_url
            .join("airports")
            .map_err(|e| AppError::InvalidUrl(e.to_string()))?;
        url.set_query(Some(&format!("apt={}", icao_codes.join(","))));
        Ok(url)
    }

    /// Fetches all `icao_codes` in one request.
    ///
    /// The result holds an entry for every requested code. Codes the registry
    /// has no record for (missing key, `null` or empty array) map to
    /// [`NewAirport::default`]; when the registry
    /// returns several records for a code only the first is used.
    ///
    /// # Errors
    ///
    /// - `AppError::GatewayTimeout` if the request times out.
    /// - `AppError::BadRequest` if the registry answers with a non-2xx status.
    /// - `AppError::ClientError` for any other transport failure or a body
    ///   that is not the expected JSON object.
    pub async fn fetch_airports(
        &self,
        icao_codes: &[String],
    ) -> Result<HashMap<String, NewAirport>, AppError> {
        let url = self.airports_url(icao_codes)?;
        debug!(url = %url, "Requesting airports from registry");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            error!(status = status.as_u16(), url = %url, "Registry rejected request");
            return Err(AppError::BadRequest(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            )));
        }

        let body = resp.bytes().await.map_err(|e| self.classify(e))?;

        // A code can map to `null` as well as to an empty array.
        let mut records: HashMap<String, Option<Vec<AviationAirport>>> =
            serde_json::from_slice(&body).map_err(|e| {
                error!(error = %e, "Registry returned a malformed body");
                AppError::ClientError(format!("Malformed registry response: {}", e))
            })?;

        let mut airports = HashMap::with_capacity(icao_codes.len());
        for code in icao_codes {
            let first = records
                .remove(code)
                .flatten()
                .and_then(|list| list.into_iter().next());

            let airport = match first {
                Some(raw) => Self::into_new_airport(code, raw),
                None => {
                    warn!(icao_code = %code, "Registry has no record");
                    NewAirport::default()
                }
            };
            airports.insert(code.clone(), airport);
        }

        Ok(airports)
    }

    /// Maps a reqwest failure onto the error taxonomy.
    fn classify(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            error!(timeout_secs = self.timeout.as_secs(), "Registry request timed out");
            AppError::GatewayTimeout(self.timeout.as_secs())
        } else if e.is_connect() {
            error!(error = %e, "Cannot connect to registry");
            AppError::ClientError(format!("Connection failed: {}", e))
        } else {
            error!(error = %e, "Registry request failed");
            AppError::ClientError(e.to_string())
        }
    }

    /// Converts a registry record into the normalized input for `icao_code`.
    ///
    /// The stored code is always the requested one, so the record that gets
    /// inserted is the one the store was probed for.
    ///
    /// - `status`: `"O"` means active, anything else inactive
    /// - `control_tower`: `"Y"` means towered, anything else not
    /// - `ownership` / `use`: `"PU"` public, `"PR"` private, otherwise unset
    /// - `elevation`: integer feet, unset when not an integer
    /// - `effective_date`: `DD/MM/YYYY`, unset when unparsable
    /// - `type`: matched case-insensitively against airport / heliport
    /// - `iata_code`: copied from `faa_ident`; `country` is never set
    /// - text fields: trimmed, unset when blank
    ///
    /// # Examples
    ///
    /// ```
    /// use aerodex_client::{AviationAirport, AviationClient};
    /// use aerodex_core::Ownership;
    ///
    /// let raw = AviationAirport {
    ///     facility_name: Some("SEATTLE-TACOMA INTL".to_string()),
    ///     ownership: Some("PU".to_string()),
    ///     elevation: Some("433".to_string()),
    ///     status: Some("O".to_string()),
    ///     ..Default::default()
    /// };
    ///
    /// let airport = AviationClient::into_new_airport("KSEA", raw);
    /// assert_eq!(airport.icao_code, "KSEA");
    /// assert_eq!(airport.ownership, Some(Ownership::Public));
    /// assert_eq!(airport.elevation, Some(433));
    /// assert_eq!(airport.active, Some(true));
    /// ```
    pub fn into_new_airport(icao_code: &str, raw: AviationAirport) -> NewAirport {
        let raw_str = |field: &Option<String>| field.as_deref().unwrap_or("").to_string();

        NewAirport {
            icao_code: icao_code.to_string(),
            site_number: text(raw.site_number),
            iata_code: text(raw.faa_ident.clone()),
            faa_code: text(raw.faa_ident),
            name: text(raw.facility_name),
            facility_type: FacilityType::parse(&raw_str(&raw.facility_type)),
            active: Some(raw_str(&raw.status) == "O"),
            country: None,
            state: text(raw.state),
            state_full: text(raw.state_full),
            county: text(raw.county),
            city: text(raw.city),
            ownership: Ownership::from_code(&raw_str(&raw.ownership)),
            use_type: UseType::from_code(&raw_str(&raw.use_type)),
            manager: text(raw.manager),
            manager_phone: text(raw.manager_phone),
            latitude: text(raw.latitude),
            latitude_sec: text(raw.latitude_sec),
            longitude: text(raw.longitude),
            longitude_sec: text(raw.longitude_sec),
            elevation: raw_str(&raw.elevation).parse::<i64>().ok(),
            control_tower: Some(raw_str(&raw.control_tower) == "Y"),
            unicom: text(raw.unicom),
            ctaf: text(raw.ctaf),
            effective_date: parse_effective_date(&raw_str(&raw.effective_date)),
        }
    }
}

#[async_trait]
impl UpstreamFetcher for AviationClient {
    async fn fetch(&self, icao_codes: &[String]) -> Result<HashMap<String, NewAirport>, AppError> {
        self.fetch_airports(icao_codes).await
    }
}

/// Trimmed text, `None` when missing or blank.
fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_effective_date(value: &str) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, EFFECTIVE_DATE_FORMAT).ok()
}
