//! HTTP client for Hub API communication.
//!
//! This module provides the [`HttpClient`] type, the request executor behind
//! every generated operation. It merges credentials into the payload, sends
//! the request, classifies the response and retries transient failures.

use std::io::Write;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_ENCODING, CONTENT_TYPE, USER_AGENT};
use serde_json::{Map, Value};

use crate::auth::Credentials;
use crate::clients::errors::ApiError;
use crate::clients::http_request::{BodyEncoding, HttpRequest, Service};
use crate::clients::http_response::{classify, ResponseBody};
use crate::clients::retry::RetryCounter;
use crate::config::{HubConfig, HubUrl};

/// Client version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Request executor for the Hub API.
///
/// The client handles:
/// - Resolving request paths against the Hub or optimizers URL
/// - Merging the selected credential into every payload
/// - Optional gzip compression of request bodies
/// - Response classification
/// - Retrying retryable and network errors with a fixed wait
///
/// # Retry Behavior
///
/// Without an explicit [`RetryCounter`] on the request, GET requests use the
/// configured budgets and every other method uses [`RetryCounter::none`],
/// since repeating a write is not safe.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`. Each request owns its retry counter, so
/// concurrent calls never share mutable state.
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL of the Hub app.
    hub_url: HubUrl,
    /// Base URL of the optimizers service, if configured.
    optimizers_url: Option<HubUrl>,
    /// Credential set consulted on every request.
    credentials: Credentials,
    /// Budgets for requests without an explicit counter.
    default_retries: RetryCounter,
    /// Fixed wait between attempts.
    retry_wait: Duration,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &HubConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Hub API Client v{CLIENT_VERSION} | Rust");

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&user_agent) {
            default_headers.insert(USER_AGENT, value);
        }

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(default_headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build().expect("Failed to create HTTP client");

        Self {
            client,
            hub_url: config.hub_url().clone(),
            optimizers_url: config.optimizers_url().cloned(),
            credentials: config.credentials().clone(),
            default_retries: RetryCounter::from_config(config),
            retry_wait: config.retry_wait(),
        }
    }

    /// Returns the Hub app URL.
    #[must_use]
    pub const fn hub_url(&self) -> &HubUrl {
        &self.hub_url
    }

    /// Returns the optimizers service URL, if configured.
    #[must_use]
    pub const fn optimizers_url(&self) -> Option<&HubUrl> {
        self.optimizers_url.as_ref()
    }

    /// Returns the fixed wait between attempts.
    #[must_use]
    pub const fn retry_wait(&self) -> Duration {
        self.retry_wait
    }

    /// Returns the retry counter a request of this method starts with.
    #[must_use]
    pub fn default_retry_counter(&self, request: &HttpRequest) -> RetryCounter {
        match request.retry_counter {
            Some(counter) => counter,
            None if request.http_method.is_idempotent_read() => self.default_retries,
            None => RetryCounter::none(),
        }
    }

    /// Sends a request, retrying transient failures.
    ///
    /// [`ErrorKind::InvalidParams`](crate::ErrorKind::InvalidParams) and
    /// [`ErrorKind::Fatal`](crate::ErrorKind::Fatal) are returned at once.
    /// Retryable and network errors are retried with a fixed wait while the
    /// request's [`RetryCounter`] has budget left; the last error is returned
    /// when it runs out.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] of the final attempt, or
    /// [`ErrorKind::MissingParam`](crate::ErrorKind::MissingParam) if the
    /// request targets an unconfigured service.
    pub async fn request(&self, request: HttpRequest) -> Result<ResponseBody, ApiError> {
        let base_url = match request.service {
            Service::Hub => &self.hub_url,
            Service::Optimizers => self.optimizers_url.as_ref().ok_or_else(|| {
                ApiError::missing_param("pass optimizers_url in HubApiClient configuration")
            })?,
        };
        let url = base_url
            .join(&request.path)
            .ok_or_else(|| ApiError::fatal(format!("invalid request path '{}'", request.path)))?;
        let body = self.encode_body(&request)?;

        let mut counter = self.default_retry_counter(&request);
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            tracing::debug!(
                method = %request.http_method,
                url = %url,
                attempt,
                "Sending Hub API request"
            );

            let error = match self.send_once(&request, url.clone(), body.clone()).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if !error.is_retryable() || !counter.is_retries_available() {
                return Err(error);
            }

            tracing::warn!(
                kind = %error.kind(),
                retries_left = counter.retries_left(),
                connection_retries_left = counter.connection_retries_left(),
                wait_ms = u64::try_from(self.retry_wait.as_millis()).unwrap_or(u64::MAX),
                "Retrying Hub API request to {}: {}",
                request.path,
                error.message()
            );
            tokio::time::sleep(self.retry_wait).await;
            counter
                .count_retry(&error)
                .map_err(|e| ApiError::fatal(e.to_string()))?;
        }
    }

    /// Sends a single attempt and classifies the result.
    async fn send_once(
        &self,
        request: &HttpRequest,
        url: reqwest::Url,
        body: Vec<u8>,
    ) -> Result<ResponseBody, ApiError> {
        let mut builder = self
            .client
            .request(request.http_method.as_reqwest(), url)
            .body(body);
        if request.body_encoding == BodyEncoding::Gzip {
            builder = builder.header(CONTENT_ENCODING, "gzip");
        }

        let res = builder.send().await?;
        let status = res.status().as_u16();
        let text = res.text().await?;

        classify(status, &text, request.response_mode)
    }

    /// Merges credentials into the payload and serializes it.
    fn encode_body(&self, request: &HttpRequest) -> Result<Vec<u8>, ApiError> {
        let payload = merge_payload(&request.payload, &self.credentials);
        let json = serde_json::to_vec(&Value::Object(payload))
            .map_err(|e| ApiError::fatal(format!("failed to serialize payload: {e}")))?;

        match request.body_encoding {
            BodyEncoding::Json => Ok(json),
            BodyEncoding::Gzip => gzip(&json)
                .map_err(|e| ApiError::fatal(format!("failed to compress payload: {e}"))),
        }
    }
}

/// Returns the caller payload with the selected credential merged in.
///
/// The credential overwrites a caller field of the same name.
#[must_use]
pub fn merge_payload(payload: &Map<String, Value>, credentials: &Credentials) -> Map<String, Value> {
    let mut merged = payload.clone();
    merged.extend(credentials.select());
    merged
}

fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::http_request::HttpMethod;
    use crate::config::ApiToken;
    use flate2::read::GzDecoder;
    use serde_json::json;
    use std::io::Read;

    fn create_test_config() -> HubConfig {
        HubConfig::builder()
            .hub_url(HubUrl::new("http://localhost:5000").unwrap())
            .retries_count(3)
            .connection_retries_count(4)
            .system_token(ApiToken::new("system").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_construction_from_config() {
        let client = HttpClient::new(&create_test_config());

        assert_eq!(client.hub_url().as_ref(), "http://localhost:5000/");
        assert!(client.optimizers_url().is_none());
        assert_eq!(client.retry_wait(), Duration::from_secs(5));
    }

    #[test]
    fn test_get_requests_default_to_configured_retries() {
        let client = HttpClient::new(&create_test_config());
        let request = HttpRequest::builder(HttpMethod::Get, "/api/v1/clusters").build();

        assert_eq!(
            client.default_retry_counter(&request),
            RetryCounter::new(3, 4)
        );
    }

    #[test]
    fn test_writes_default_to_no_retries() {
        let client = HttpClient::new(&create_test_config());

        for method in [
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
        ] {
            let request = HttpRequest::builder(method, "/api/v1/clusters").build();
            assert_eq!(client.default_retry_counter(&request), RetryCounter::none());
        }
    }

    #[test]
    fn test_explicit_counter_wins() {
        let client = HttpClient::new(&create_test_config());
        let request = HttpRequest::builder(HttpMethod::Post, "/next_trials")
            .retry_counter(RetryCounter::new(1, 1))
            .build();

        assert_eq!(
            client.default_retry_counter(&request),
            RetryCounter::new(1, 1)
        );
    }

    #[test]
    fn test_merge_payload_adds_selected_credential() {
        let credentials = create_test_config().credentials().clone();
        let mut payload = Map::new();
        payload.insert("limit".to_string(), json!(50));
        payload.insert("system_token".to_string(), json!("spoofed"));

        let merged = merge_payload(&payload, &credentials);
        assert_eq!(merged["limit"], json!(50));
        assert_eq!(merged["system_token"], json!("system"));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_gzip_body_decompresses_to_payload() {
        let client = HttpClient::new(&create_test_config());
        let request = HttpRequest::builder(HttpMethod::Post, "/next_trials")
            .param("trials", json!([1, 2, 3]))
            .body_encoding(BodyEncoding::Gzip)
            .build();

        let body = client.encode_body(&request).unwrap();
        let mut decoded = String::new();
        GzDecoder::new(body.as_slice())
            .read_to_string(&mut decoded)
            .unwrap();

        let value: Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(value, json!({"trials": [1, 2, 3], "system_token": "system"}));
    }

    #[tokio::test]
    async fn test_optimizers_request_without_url_is_missing_param() {
        let client = HttpClient::new(&create_test_config());
        let request = HttpRequest::builder(HttpMethod::Post, "/next_trials")
            .service(Service::Optimizers)
            .build();

        let error = client.request(request).await.unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::MissingParam);
    }
}
