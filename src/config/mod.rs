//! Configuration types for the Hub API client.
//!
//! # Overview
//!
//! - [`HubConfig`]: The immutable settings a client is built from
//! - [`HubConfigBuilder`]: A builder for constructing [`HubConfig`] instances
//! - [`HubSettings`]: Deserializable form mirroring the deployment config keys
//! - [`HubUrl`]: A validated service URL
//! - [`ApiToken`]: A validated credential with masked debug output
//!
//! # Example
//!
//! ```rust
//! use hub_api_client::{ApiToken, HubConfig, HubUrl};
//! use std::time::Duration;
//!
//! let config = HubConfig::builder()
//!     .hub_url(HubUrl::new("https://hub.example.com").unwrap())
//!     .project_api_token(ApiToken::new("project-token").unwrap())
//!     .retries_count(3)
//!     .retry_wait(Duration::from_secs(1))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.retries_count(), 3);
//! assert_eq!(config.connection_retries_count(), 3);
//! ```

mod newtypes;

pub use newtypes::{ApiToken, HubUrl};

use std::time::Duration;

use serde::Deserialize;

use crate::auth::{AuthPolicy, Credentials};
use crate::error::ConfigError;

/// Default number of retries for retryable API errors.
pub const DEFAULT_RETRIES_COUNT: u32 = 5;

/// Default fixed wait between attempts, in seconds.
pub const DEFAULT_RETRY_WAIT_SECONDS: u64 = 5;

/// Configuration for a [`HubApiClient`](crate::HubApiClient).
///
/// # Thread Safety
///
/// `HubConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct HubConfig {
    hub_url: HubUrl,
    optimizers_url: Option<HubUrl>,
    credentials: Credentials,
    auth_policy: AuthPolicy,
    retries_count: u32,
    connection_retries_count: u32,
    retry_wait: Duration,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl HubConfig {
    /// Creates a new builder for constructing a `HubConfig`.
    #[must_use]
    pub fn builder() -> HubConfigBuilder {
        HubConfigBuilder::new()
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

    /// Returns the configured credential set.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the credential policy.
    #[must_use]
    pub const fn auth_policy(&self) -> AuthPolicy {
        self.auth_policy
    }

    /// Returns how many times a retryable API error is retried.
    #[must_use]
    pub const fn retries_count(&self) -> u32 {
        self.retries_count
    }

    /// Returns how many times a network error is retried.
    #[must_use]
    pub const fn connection_retries_count(&self) -> u32 {
        self.connection_retries_count
    }

    /// Returns the fixed wait between attempts.
    #[must_use]
    pub const fn retry_wait(&self) -> Duration {
        self.retry_wait
    }

    /// Returns the total request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the connect timeout, if configured.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify HubConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HubConfig>();
};

/// Builder for constructing [`HubConfig`] instances.
///
/// The only required field is `hub_url`.
///
/// # Defaults
///
/// - `retries_count`: 5
/// - `connection_retries_count`: same as `retries_count`
/// - `retry_wait`: 5 seconds
/// - `auth_policy`: [`AuthPolicy::Permissive`]
/// - `optimizers_url`, timeouts, `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct HubConfigBuilder {
    hub_url: Option<HubUrl>,
    optimizers_url: Option<HubUrl>,
    credentials: Credentials,
    auth_policy: Option<AuthPolicy>,
    retries_count: Option<u32>,
    connection_retries_count: Option<u32>,
    retry_wait: Option<Duration>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl HubConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Hub app URL (required).
    #[must_use]
    pub fn hub_url(mut self, url: HubUrl) -> Self {
        self.hub_url = Some(url);
        self
    }

    /// Sets the optimizers service URL.
    #[must_use]
    pub fn optimizers_url(mut self, url: HubUrl) -> Self {
        self.optimizers_url = Some(url);
        self
    }

    /// Sets the project-scoped token (highest priority).
    #[must_use]
    pub fn project_api_token(mut self, token: ApiToken) -> Self {
        self.credentials.project_api_token = Some(token);
        self
    }

    /// Sets the cluster-scoped token.
    #[must_use]
    pub fn cluster_api_token(mut self, token: ApiToken) -> Self {
        self.credentials.cluster_api_token = Some(token);
        self
    }

    /// Sets the user session token.
    #[must_use]
    pub fn token(mut self, token: ApiToken) -> Self {
        self.credentials.token = Some(token);
        self
    }

    /// Sets the system token (lowest priority).
    #[must_use]
    pub fn system_token(mut self, token: ApiToken) -> Self {
        self.credentials.system_token = Some(token);
        self
    }

    /// Replaces the whole credential set.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the credential policy.
    #[must_use]
    pub const fn auth_policy(mut self, policy: AuthPolicy) -> Self {
        self.auth_policy = Some(policy);
        self
    }

    /// Sets how many times a retryable API error is retried.
    #[must_use]
    pub const fn retries_count(mut self, count: u32) -> Self {
        self.retries_count = Some(count);
        self
    }

    /// Sets how many times a network error is retried.
    #[must_use]
    pub const fn connection_retries_count(mut self, count: u32) -> Self {
        self.connection_retries_count = Some(count);
        self
    }

    /// Sets the fixed wait between attempts.
    #[must_use]
    pub const fn retry_wait(mut self, wait: Duration) -> Self {
        self.retry_wait = Some(wait);
        self
    }

    /// Sets the total per-attempt request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`HubConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `hub_url` is not set,
    /// or [`ConfigError::MissingCredentials`] if the policy is
    /// [`AuthPolicy::Required`] and no credential was supplied.
    pub fn build(self) -> Result<HubConfig, ConfigError> {
        let hub_url = self.hub_url.ok_or(ConfigError::MissingRequiredField {
            field: "hub_app_url",
        })?;

        let auth_policy = self.auth_policy.unwrap_or_default();
        if auth_policy == AuthPolicy::Required && self.credentials.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        let retries_count = self.retries_count.unwrap_or(DEFAULT_RETRIES_COUNT);

        Ok(HubConfig {
            hub_url,
            optimizers_url: self.optimizers_url,
            credentials: self.credentials,
            auth_policy,
            retries_count,
            connection_retries_count: self.connection_retries_count.unwrap_or(retries_count),
            retry_wait: self
                .retry_wait
                .unwrap_or(Duration::from_secs(DEFAULT_RETRY_WAIT_SECONDS)),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

/// Deserializable client settings using the deployment config key names.
///
/// Empty token strings are treated as absent, matching how unset environment
/// values usually arrive in config files.
///
/// # Example
///
/// ```rust
/// use hub_api_client::{HubConfig, HubSettings};
///
/// let settings: HubSettings = serde_json::from_value(serde_json::json!({
///     "hub_app_url": "https://hub.example.com",
///     "hub_system_token": "system",
///     "retries_count": 2
/// })).unwrap();
///
/// let config = HubConfig::try_from(settings).unwrap();
/// assert_eq!(config.connection_retries_count(), 2);
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct HubSettings {
    /// Base URL of the Hub app.
    pub hub_app_url: Option<String>,
    /// Base URL of the optimizers service.
    pub optimizers_url: Option<String>,
    /// User session token.
    pub token: Option<String>,
    /// System token.
    pub hub_system_token: Option<String>,
    /// Cluster-scoped token.
    pub hub_cluster_api_token: Option<String>,
    /// Project-scoped token.
    pub hub_project_api_token: Option<String>,
    /// Retries for retryable API errors.
    pub retries_count: Option<u32>,
    /// Retries for network errors.
    pub connection_retries_count: Option<u32>,
    /// Fixed wait between attempts, in seconds.
    pub retry_wait_seconds: Option<u64>,
    /// Credential policy.
    pub auth_policy: Option<AuthPolicy>,
}

fn optional_token(value: Option<String>) -> Result<Option<ApiToken>, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .map(ApiToken::new)
        .transpose()
}

impl TryFrom<HubSettings> for HubConfig {
    type Error = ConfigError;

    fn try_from(settings: HubSettings) -> Result<Self, Self::Error> {
        let credentials = Credentials {
            project_api_token: optional_token(settings.hub_project_api_token)?,
            cluster_api_token: optional_token(settings.hub_cluster_api_token)?,
            token: optional_token(settings.token)?,
            system_token: optional_token(settings.hub_system_token)?,
        };

        let mut builder = HubConfigBuilder::new().credentials(credentials);

        if let Some(url) = settings.hub_app_url {
            builder = builder.hub_url(HubUrl::new(url)?);
        }
        if let Some(url) = settings.optimizers_url.filter(|u| !u.is_empty()) {
            builder = builder.optimizers_url(HubUrl::new(url)?);
        }
        if let Some(count) = settings.retries_count {
            builder = builder.retries_count(count);
        }
        if let Some(count) = settings.connection_retries_count {
            builder = builder.connection_retries_count(count);
        }
        if let Some(seconds) = settings.retry_wait_seconds {
            builder = builder.retry_wait(Duration::from_secs(seconds));
        }
        if let Some(policy) = settings.auth_policy {
            builder = builder.auth_policy(policy);
        }

        builder.build()
    }
}
