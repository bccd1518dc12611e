//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use reqwest::Url;
use serde::{de, Deserialize, Deserializer};
use std::fmt;

/// A validated authentication token.
///
/// The `Debug` implementation masks the value so tokens never end up in logs.
///
/// # Example
///
/// ```rust
/// use hub_api_client::ApiToken;
///
/// let token = ApiToken::new("secret-token").unwrap();
/// assert_eq!(token.as_ref(), "secret-token");
/// assert_eq!(format!("{:?}", token), "ApiToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Creates a new validated token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for ApiToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(*****)")
    }
}

impl<'de> Deserialize<'de> for ApiToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated absolute service URL (the Hub app or the optimizers service).
///
/// Request paths are joined onto this URL the way a browser resolves links,
/// so an absolute path such as `/api/v1/projects` replaces any path on the base.
///
/// # Example
///
/// ```rust
/// use hub_api_client::HubUrl;
///
/// let url = HubUrl::new("https://hub.example.com").unwrap();
/// assert_eq!(url.join("/api/v1/projects").unwrap().as_str(), "https://hub.example.com/api/v1/projects");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HubUrl(Url);

impl HubUrl {
    /// Creates a new validated URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the value is not an absolute
    /// `http` or `https` URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim();

        let parsed = Url::parse(trimmed).map_err(|_| ConfigError::InvalidUrl { url: url.clone() })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidUrl { url });
        }

        Ok(Self(parsed))
    }

    /// Resolves `path` against this URL, or `None` if the result is not a valid URL.
    #[must_use]
    pub fn join(&self, path: &str) -> Option<Url> {
        self.0.join(path).ok()
    }

    /// Returns the underlying URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }
}

impl AsRef<str> for HubUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<'de> Deserialize<'de> for HubUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
