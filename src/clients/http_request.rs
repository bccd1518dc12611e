//! HTTP request types for the Hub API client.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! describing one logical request to the Hub or the optimizers service.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::clients::retry::RetryCounter;

/// HTTP methods supported by the Hub API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for updating resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns `true` for methods that are safe to repeat.
    #[must_use]
    pub const fn is_idempotent_read(&self) -> bool {
        matches!(self, Self::Get)
    }

    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            _ => Err(format!("Invalid Http method {s}.")),
        }
    }
}

/// Which backend a request is addressed to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Service {
    /// The Hub app (`hub_app_url`).
    #[default]
    Hub,
    /// The optimizers service (`optimizers_url`).
    Optimizers,
}

/// How the response body is handed back to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseMode {
    /// Parse the body as JSON.
    #[default]
    Json,
    /// Return the body as raw text.
    PlainText,
}

/// How the request payload is put on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyEncoding {
    /// Plain JSON body.
    #[default]
    Json,
    /// Gzip-compressed JSON body with `Content-Encoding: gzip`.
    Gzip,
}

/// One logical request, possibly sent several times by the retry loop.
///
/// # Example
///
/// ```rust
/// use hub_api_client::clients::{HttpMethod, HttpRequest, ResponseMode};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/api/v1/status")
///     .param("object", "project")
///     .param("id", 1)
///     .build();
///
/// assert_eq!(request.payload["object"], json!("project"));
/// assert_eq!(request.response_mode, ResponseMode::Json);
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path, resolved against the target service URL.
    pub path: String,
    /// The target service.
    pub service: Service,
    /// The JSON payload, before credentials are merged in.
    pub payload: Map<String, Value>,
    /// Explicit retry budgets. `None` picks the default for the method.
    pub retry_counter: Option<RetryCounter>,
    /// How to return the response body.
    pub response_mode: ResponseMode,
    /// How to encode the payload.
    pub body_encoding: BodyEncoding,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    request: HttpRequest,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            request: HttpRequest {
                http_method: method,
                path: path.into(),
                service: Service::Hub,
                payload: Map::new(),
                retry_counter: None,
                response_mode: ResponseMode::Json,
                body_encoding: BodyEncoding::Json,
            },
        }
    }

    /// Sets the whole payload.
    #[must_use]
    pub fn payload(mut self, payload: Map<String, Value>) -> Self {
        self.request.payload = payload;
        self
    }

    /// Adds a single payload field.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request.payload.insert(key.into(), value.into());
        self
    }

    /// Sets the target service.
    #[must_use]
    pub const fn service(mut self, service: Service) -> Self {
        self.request.service = service;
        self
    }

    /// Sets explicit retry budgets.
    #[must_use]
    pub const fn retry_counter(mut self, counter: RetryCounter) -> Self {
        self.request.retry_counter = Some(counter);
        self
    }

    /// Sets the response mode.
    #[must_use]
    pub const fn response_mode(mut self, mode: ResponseMode) -> Self {
        self.request.response_mode = mode;
        self
    }

    /// Sets the body encoding.
    #[must_use]
    pub const fn body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.request.body_encoding = encoding;
        self
    }

    /// Builds the [`HttpRequest`].
    #[must_use]
    pub fn build(self) -> HttpRequest {
        self.request
    }
}
