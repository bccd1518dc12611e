//! Classified request errors.
//!
//! Every failure of a Hub API call surfaces as an [`ApiError`] tagged with an
//! [`ErrorKind`]. The kind tells the caller what can be done about it:
//!
//! - [`ErrorKind::InvalidParams`]: the server rejected the input (HTTP 400); fix the input
//! - [`ErrorKind::Fatal`]: bad credential, missing resource or broken server; fix the setup
//! - [`ErrorKind::Retryable`]: transient server-side failure; retried automatically
//! - [`ErrorKind::Network`]: transport failure; retried automatically
//! - [`ErrorKind::MissingParam`]: a required argument or setting is absent; nothing was sent
//!
//! # Example
//!
//! ```rust,ignore
//! use hub_api_client::{ErrorKind, OperationArgs};
//!
//! match client.call("create_experiment", OperationArgs::new().param("name", "e1")).await {
//!     Ok(body) => println!("created: {}", body["data"]),
//!     Err(e) if e.kind() == ErrorKind::InvalidParams => {
//!         println!("rejected fields: {:?}", e.error_params());
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// The category of an [`ApiError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-supplied data was rejected (HTTP 400). Never retried.
    InvalidParams,
    /// Misconfiguration or server fault no retry can fix. Never retried.
    Fatal,
    /// Transient server-side failure.
    Retryable,
    /// Transport-level connection failure.
    Network,
    /// A required argument or setting was not supplied. Raised before sending.
    MissingParam,
}

impl ErrorKind {
    /// Returns `true` for the kinds the request executor retries.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Retryable | Self::Network)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams => write!(f, "invalid params"),
            Self::Fatal => write!(f, "fatal"),
            Self::Retryable => write!(f, "retryable"),
            Self::Network => write!(f, "network"),
            Self::MissingParam => write!(f, "missing param"),
        }
    }
}

/// A classified Hub API error.
///
/// Carries a human-readable message and the raw `meta` object of the error
/// response (an empty object when none was available).
#[derive(Clone, Debug, Error)]
#[error("{kind} error: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    metadata: Value,
}

impl ApiError {
    /// Creates an error of the given kind with explicit metadata.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>, metadata: Value) -> Self {
        Self {
            kind,
            message: message.into(),
            metadata,
        }
    }

    fn without_metadata(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind, message, Value::Object(Map::new()))
    }

    /// Creates a [`ErrorKind::Fatal`] error without metadata.
    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::without_metadata(ErrorKind::Fatal, message)
    }

    /// Creates a [`ErrorKind::Network`] error without metadata.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::without_metadata(ErrorKind::Network, message)
    }

    /// Creates a [`ErrorKind::MissingParam`] error without metadata.
    #[must_use]
    pub fn missing_param(message: impl Into<String>) -> Self {
        Self::without_metadata(ErrorKind::MissingParam, message)
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the `meta` object of the error response, or an empty object.
    #[must_use]
    pub const fn metadata(&self) -> &Value {
        &self.metadata
    }

    /// Returns `true` if the request executor retries this error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Returns the `error_param` of every entry in `metadata.errors`.
    #[must_use]
    pub fn error_params(&self) -> Vec<&str> {
        self.metadata
            .get("errors")
            .and_then(Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.get("error_param").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::network(error.to_string())
    }
}

/// Returned when a retry is counted for an error that is not retryable.
///
/// This is a programming error in the retry loop, never a server condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unsupported kind of error for retry: {kind}")]
pub struct UnretryableError {
    /// The kind that was passed.
    pub kind: ErrorKind,
}
