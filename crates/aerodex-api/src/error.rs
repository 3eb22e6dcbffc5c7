use aerodex_core::error::{AppError, ErrorKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Error type for HTTP handlers.
///
/// Wraps [`AppError`] for domain errors and adds the request-shape failures
/// that never reach the domain layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A domain-level error from `aerodex_core`.
    #[error(transparent)]
    Core(#[from] AppError),

    /// The request body could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Core(err) => match err.kind() {
                ErrorKind::Validation => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    err.to_string(),
                ),
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                ErrorKind::BadRequest => {
                    tracing::warn!(error = %err, "Upstream rejected request");
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_REJECTED", err.to_string())
                }
                ErrorKind::GatewayTimeout => {
                    tracing::warn!(error = %err, "Upstream timed out");
                    (
                        StatusCode::GATEWAY_TIMEOUT,
                        "UPSTREAM_TIMEOUT",
                        err.to_string(),
                    )
                }
                ErrorKind::Internal => {
                    tracing::error!(error = %err, "Internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
