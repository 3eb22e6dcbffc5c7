//! Router tests: status mapping, response bodies and middleware, with fake
//! collaborators in place of the database and the upstream registry.

use std::sync::{Arc, Mutex};

use aerodex_api::{build_app_router, AirportLookup, AppState, ServerConfig};
use aerodex_core::error::AppError;
use aerodex_core::models::Airport;
use aerodex_core::reconciler::AirportSync;
use aerodex_core::sync::{validate_icao_codes, SyncOutcome};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

enum Script {
    Outcomes(Vec<SyncOutcome>),
    Fail(fn() -> AppError),
}

struct FakeSync {
    script: Script,
    calls: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl AirportSync for FakeSync {
    async fn sync_airports(&self, icao_codes: &[String]) -> Result<Vec<SyncOutcome>, AppError> {
        validate_icao_codes(icao_codes)?;
        self.calls.lock().unwrap().push(icao_codes.to_vec());
        match &self.script {
            Script::Outcomes(outcomes) => Ok(outcomes.clone()),
            Script::Fail(make) => Err(make()),
        }
    }
}

struct FakeLookup {
    stored: Vec<Airport>,
}

#[async_trait]
impl AirportLookup for FakeLookup {
    async fn find_by_icao(&self, icao_code: &str) -> Result<Option<Airport>, AppError> {
        Ok(self
            .stored
            .iter()
            .find(|a| a.icao_code == icao_code)
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn airport(code: &str) -> Airport {
    let now = Utc::now();
    Airport {
        id: Uuid::new_v4(),
        icao_code: code.to_string(),
        site_number: None,
        faa_code: None,
        iata_code: None,
        name: Some("SEATTLE-TACOMA INTL".to_string()),
        facility_type: None,
        active: Some(true),
        country: None,
        state: None,
        state_full: None,
        county: None,
        city: None,
        ownership: None,
        use_type: None,
        manager: None,
        manager_phone: None,
        latitude: None,
        latitude_sec: None,
        longitude: None,
        longitude_sec: None,
        elevation: Some(433),
        control_tower: Some(true),
        unicom: None,
        ctaf: None,
        effective_date: None,
        created_at: now,
        updated_at: now,
    }
}

fn build_test_app(script: Script, stored: Vec<Airport>) -> (Router, Arc<FakeSync>) {
    let sync = Arc::new(FakeSync {
        script,
        calls: Mutex::new(Vec::new()),
    });
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
    };
    let state = AppState {
        sync: sync.clone(),
        airports: Arc::new(FakeLookup { stored }),
    };
    (build_app_router(state, &config), sync)
}

async fn post_json(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// POST /sync/airports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sync_returns_outcomes_in_order() {
    let outcomes = vec![
        SyncOutcome::skipped("KJFK"),
        SyncOutcome::inserted("KSEA", airport("KSEA")),
        SyncOutcome::not_found("KXXX"),
    ];
    let (app, sync) = build_test_app(Script::Outcomes(outcomes), vec![]);

    let response = post_json(
        app,
        "/sync/airports",
        r#"{"icao_codes":["KJFK","KSEA","KXXX"]}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 3);

    assert_eq!(items[0]["icao_code"], "KJFK");
    assert_eq!(items[0]["status"], "Skipped");
    assert_eq!(items[0]["airport"], Value::Null);
    assert_eq!(items[0]["message"], "already present");

    assert_eq!(items[1]["status"], "Inserted");
    assert_eq!(items[1]["airport"]["icao_code"], "KSEA");
    assert_eq!(items[1]["message"], "persisted successfully");

    assert_eq!(items[2]["status"], "Not Found");
    assert_eq!(items[2]["message"], "no data from upstream");

    assert_eq!(sync.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn sync_with_empty_list_is_400() {
    let (app, sync) = build_test_app(Script::Outcomes(vec![]), vec![]);

    let response = post_json(app, "/sync/airports", r#"{"icao_codes":[]}"#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(sync.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sync_with_blank_code_is_400() {
    let (app, _) = build_test_app(Script::Outcomes(vec![]), vec![]);

    let response = post_json(app, "/sync/airports", r#"{"icao_codes":["KSEA","  "]}"#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sync_with_malformed_body_is_400() {
    let (app, sync) = build_test_app(Script::Outcomes(vec![]), vec![]);

    let response = post_json(app, "/sync/airports", r#"{"icao_codes": "KSEA"#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(sync.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upstream_rejection_is_502() {
    let (app, _) = build_test_app(
        Script::Fail(|| AppError::BadRequest("HTTP 400 from registry".to_string())),
        vec![],
    );

    let response = post_json(app, "/sync/airports", r#"{"icao_codes":["KSEA"]}"#).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_REJECTED");
}

#[tokio::test]
async fn upstream_timeout_is_504() {
    let (app, _) = build_test_app(Script::Fail(|| AppError::GatewayTimeout(60)), vec![]);

    let response = post_json(app, "/sync/airports", r#"{"icao_codes":["KSEA"]}"#).await;

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_TIMEOUT");
    assert_eq!(json["error"], "Upstream timed out after 60 seconds");
}

#[tokio::test]
async fn storage_failure_is_500_without_details() {
    let (app, _) = build_test_app(
        Script::Fail(|| AppError::DatabaseError(sqlx::Error::PoolClosed)),
        vec![],
    );

    let response = post_json(app, "/sync/airports", r#"{"icao_codes":["KSEA"]}"#).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// GET /airports/{icao}, GET /health, middleware
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_stored_airport() {
    let (app, _) = build_test_app(Script::Outcomes(vec![]), vec![airport("KSEA")]);

    let response = get(app, "/airports/KSEA").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["icao_code"], "KSEA");
    assert_eq!(json["elevation"], 433);
}

#[tokio::test]
async fn get_missing_airport_is_404() {
    let (app, _) = build_test_app(Script::Outcomes(vec![]), vec![]);

    let response = get(app, "/airports/KXXX").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Airport not found: KXXX");
}

#[tokio::test]
async fn health_is_ok() {
    let (app, _) = build_test_app(Script::Outcomes(vec![]), vec![]);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn response_carries_request_id() {
    let (app, _) = build_test_app(Script::Outcomes(vec![]), vec![]);

    let response = get(app, "/health").await;

    let request_id = response.headers().get("x-request-id");
    assert!(request_id.is_some(), "Response must contain an x-request-id header");
    assert_eq!(request_id.unwrap().to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (app, _) = build_test_app(Script::Outcomes(vec![]), vec![]);

    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
