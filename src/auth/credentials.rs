//! Credential set and token selection.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::ApiToken;

/// Whether requests may be sent without any credential.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthPolicy {
    /// Requests without a configured credential go out unauthenticated.
    #[default]
    Permissive,
    /// At least one credential must be configured; checked when the
    /// configuration is built, never at request time.
    Required,
}

/// The ordered set of credentials a client may authenticate with.
///
/// Fields are listed from most to least specific. Exactly one of them is sent
/// with each request: the first one that is present.
///
/// # Example
///
/// ```rust
/// use hub_api_client::{ApiToken, Credentials};
///
/// let credentials = Credentials {
///     cluster_api_token: Some(ApiToken::new("cluster").unwrap()),
///     system_token: Some(ApiToken::new("system").unwrap()),
///     ..Credentials::default()
/// };
///
/// let payload = credentials.select();
/// assert_eq!(payload.len(), 1);
/// assert_eq!(payload["cluster_api_token"], "cluster");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Token scoped to one project.
    pub project_api_token: Option<ApiToken>,
    /// Token scoped to one cluster.
    pub cluster_api_token: Option<ApiToken>,
    /// User session token.
    pub token: Option<ApiToken>,
    /// System-level token.
    pub system_token: Option<ApiToken>,
}

impl Credentials {
    /// Returns `true` if no credential is configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.project_api_token.is_none()
            && self.cluster_api_token.is_none()
            && self.token.is_none()
            && self.system_token.is_none()
    }

    /// Returns the payload key and token of the credential to send, if any.
    #[must_use]
    pub fn selected(&self) -> Option<(&'static str, &ApiToken)> {
        [
            ("project_api_token", &self.project_api_token),
            ("cluster_api_token", &self.cluster_api_token),
            ("token", &self.token),
            ("system_token", &self.system_token),
        ]
        .into_iter()
        .find_map(|(key, token)| token.as_ref().map(|token| (key, token)))
    }

    /// Builds the credential fragment merged into every request payload.
    ///
    /// Returns a single-key map, or an empty map when nothing is configured.
    #[must_use]
    pub fn select(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        if let Some((key, token)) = self.selected() {
            payload.insert(key.to_string(), Value::String(token.as_ref().to_string()));
        }
        payload
    }
}
