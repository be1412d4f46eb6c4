//! Shared error type across hellometrics crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input or configuration.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in plain-text error bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, HelloMetricsError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum HelloMetricsError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("invalid metric name: {0:?}")]
    InvalidMetricName(String),
    #[error("metric {name} is not a {expected}")]
    MetricKindMismatch { name: String, expected: &'static str },
    #[error("render failed: {0}")]
    Render(#[from] std::fmt::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl HelloMetricsError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            HelloMetricsError::BadRequest(_) | HelloMetricsError::InvalidMetricName(_) => {
                ClientCode::BadRequest
            }
            HelloMetricsError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            HelloMetricsError::MetricKindMismatch { .. }
            | HelloMetricsError::Render(_)
            | HelloMetricsError::Internal(_) => ClientCode::Internal,
        }
    }
}
