//! HTTP client types for Hub API communication.
//!
//! This module is the request pipeline every generated operation runs
//! through: build an [`HttpRequest`], hand it to [`HttpClient::request`],
//! get back a [`ResponseBody`] or a classified [`ApiError`].
//!
//! # Overview
//!
//! - [`HttpClient`]: The async request executor
//! - [`HttpRequest`]: A request to be sent to the Hub or optimizers service
//! - [`HttpMethod`]: Supported HTTP methods
//! - [`ResponseMode`] / [`BodyEncoding`] / [`Service`]: Per-request options
//! - [`classify`]: Status + body → success or [`ErrorKind`]
//! - [`RetryCounter`]: Per-request retry budgets
//!
//! # Retry Behavior
//!
//! - **400**: [`ErrorKind::InvalidParams`], returned immediately
//! - **401, 403, 404, 500**: [`ErrorKind::Fatal`], returned immediately
//! - **Other non-2xx**: [`ErrorKind::Retryable`], retried after a fixed wait
//! - **Connection failures**: [`ErrorKind::Network`], retried after a fixed wait
//!
//! Retrying stops as soon as either budget of the request's
//! [`RetryCounter`] is exhausted. Only GET requests get a live counter by
//! default.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod retry;

pub use errors::{ApiError, ErrorKind, UnretryableError};
pub use http_client::{merge_payload, HttpClient, CLIENT_VERSION};
pub use http_request::{
    BodyEncoding, HttpMethod, HttpRequest, HttpRequestBuilder, ResponseMode, Service,
};
pub use http_response::{classify, extract_plain_text, ResponseBody};
pub use retry::RetryCounter;
