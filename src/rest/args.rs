//! Call arguments for generated operations.

use std::fmt::Display;

use serde_json::{Map, Value};

use crate::rest::path::parent_id_key;

/// Arguments of one operation call: an optional member id plus named params.
///
/// Named params become the JSON payload. A parent identifier travels as the
/// `<parent>_id` param, which both resolves the nested path and stays in the
/// payload.
///
/// # Example
///
/// ```rust
/// use hub_api_client::OperationArgs;
///
/// let args = OperationArgs::with_id(7)
///     .parent_id("project_run", 3)
///     .param("status", "completed");
///
/// assert_eq!(args.member_id(), Some("7"));
/// assert_eq!(args.params_map()["project_run_id"], 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationArgs {
    id: Option<String>,
    params: Map<String, Value>,
}

impl OperationArgs {
    /// Creates empty arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates arguments addressing the member `id`.
    #[must_use]
    pub fn with_id(id: impl Display) -> Self {
        Self::new().id(id)
    }

    /// Sets the member id.
    #[must_use]
    pub fn id(mut self, id: impl Display) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Adds a named param.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Adds all entries of `params`, replacing existing keys.
    #[must_use]
    pub fn params(mut self, params: Map<String, Value>) -> Self {
        self.params.extend(params);
        self
    }

    /// Adds the `<parent>_id` param for a nested resource.
    #[must_use]
    pub fn parent_id(self, parent: &str, id: impl Into<Value>) -> Self {
        self.param(parent_id_key(parent), id)
    }

    /// Returns the member id, if set.
    #[must_use]
    pub fn member_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the named params.
    #[must_use]
    pub const fn params_map(&self) -> &Map<String, Value> {
        &self.params
    }
}
