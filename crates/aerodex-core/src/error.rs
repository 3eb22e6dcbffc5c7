use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents all possible errors that can occur in Aerodex. Every
/// variant belongs to exactly one [`ErrorKind`], which is what callers (the
/// HTTP layer, the CLI) use to decide between "try again later" and "do not
/// retry".
///
/// # Error Conversion
///
/// `sqlx::Error` converts into `AppError::DatabaseError` through `#[from]`.
///
/// # Examples
///
/// ```
/// use aerodex_core::error::{AppError, ErrorKind};
///
/// let err = AppError::GatewayTimeout(60);
/// assert_eq!(err.kind(), ErrorKind::GatewayTimeout);
/// assert!(err.is_retryable());
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// The request was malformed: empty code list, blank code, bad body.
    ///
    /// Raised before any storage or network call is made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The upstream registry did not answer within the configured timeout.
    #[error("Upstream timed out after {0} seconds")]
    GatewayTimeout(u64),

    /// The upstream registry rejected the batched request (non-2xx status).
    ///
    /// The upstream's error body is not interpreted.
    #[error("Upstream rejected request: {0}")]
    BadRequest(String),

    /// Airport not present in the local store.
    #[error("Airport not found: {0}")]
    AirportNotFound(String),

    /// Database operation failed.
    ///
    /// This error wraps all errors from SQLx database operations, including
    /// connection failures, query errors, and constraint violations.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// HTTP client request failed for a reason other than a timeout or an
    /// upstream rejection: DNS, refused connection, unreadable body or a
    /// malformed JSON envelope.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// URL parsing failed.
    ///
    /// This error occurs when the configured upstream base URL cannot be
    /// parsed or cannot be used to build request endpoints.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed request; nothing was attempted.
    Validation,
    /// Upstream timed out; the caller may retry.
    GatewayTimeout,
    /// Upstream rejected the request; do not retry.
    BadRequest,
    /// The requested record does not exist.
    NotFound,
    /// Storage failure, unexpected transport failure or malformed payload.
    Internal,
}

impl AppError {
    /// Returns the classification used to map this error onto a response.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::GatewayTimeout(_) => ErrorKind::GatewayTimeout,
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::AirportNotFound(_) => ErrorKind::NotFound,
            AppError::DatabaseError(_)
            | AppError::ClientError(_)
            | AppError::InvalidUrl(_)
            | AppError::Config(_) => ErrorKind::Internal,
        }
    }

    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::DatabaseError(e) => {
                if e.to_string().contains("connection") {
                    "Cannot connect to database. Is PostgreSQL running?\n   Try: docker-compose up -d".to_string()
                } else {
                    format!("Database error: {}", e)
                }
            }
            AppError::GatewayTimeout(secs) => {
                format!(
                    "The aviation registry did not answer within {} seconds.\n   Try again later.",
                    secs
                )
            }
            AppError::BadRequest(msg) => {
                format!(
                    "The aviation registry rejected the request: {}\n   Check the facility codes.",
                    msg
                )
            }
            AppError::ClientError(msg) => {
                if msg.contains("connect") {
                    format!(
                        "Cannot reach the aviation registry: {}\n   Check your internet connection and AVIATION_API_URL.",
                        msg
                    )
                } else {
                    format!("API error: {}", msg)
                }
            }
            AppError::InvalidUrl(url) => {
                format!(
                    "Invalid aviation registry URL: {}\n   Example: https://api.aviationapi.com/v1",
                    url
                )
            }
            AppError::AirportNotFound(code) => {
                format!(
                    "No airport stored for {}.\n   Try: aerodex sync {}",
                    code, code
                )
            }
            _ => self.to_string(),
        }
    }

    /// Returns true if the caller may retry the same request later.
    ///
    /// Only upstream timeouts qualify. Upstream rejections, missing records and
    /// internal failures would fail the same way again.
    ///
    /// # Examples
    ///
    /// ```
    /// use aerodex_core::error::AppError;
    ///
    /// assert!(AppError::GatewayTimeout(60).is_retryable());
    /// assert!(!AppError::BadRequest("HTTP 400".to_string()).is_retryable());
    /// assert!(!AppError::Validation("empty".to_string()).is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::GatewayTimeout
    }
}
