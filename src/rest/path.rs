//! Path building for schema-declared resources.
//!
//! Every resource lives under [`API_PREFIX`] at its pluralized name. A
//! resource nested under a parent gets the parent's collection and a
//! `{parent_id}` placeholder in front of it:
//!
//! - `experiment` → `/api/v1/experiments`
//! - `trial` under `project_run` → `/api/v1/project_runs/{parent_id}/trials`
//!
//! The placeholder is filled per call from a `<parent>_id` argument.
//!
//! # Example
//!
//! ```rust
//! use hub_api_client::rest::{build_resource_path, pluralize, resolve_path};
//! use serde_json::{json, Map};
//!
//! assert_eq!(pluralize("cluster_status"), "cluster_statuses");
//!
//! let template = build_resource_path("trial", Some("project_run"));
//! assert_eq!(template, "/api/v1/project_runs/{parent_id}/trials");
//!
//! let mut params = Map::new();
//! params.insert("project_run_id".to_string(), json!(42));
//! let path = resolve_path(&template, Some("project_run"), &params).unwrap();
//! assert_eq!(path, "/api/v1/project_runs/42/trials");
//! ```

use serde_json::{Map, Value};

use crate::clients::ApiError;

/// Path prefix of every Hub resource.
pub const API_PREFIX: &str = "/api/v1";

/// Placeholder for the parent identifier in nested templates.
pub const PARENT_ID_PLACEHOLDER: &str = "{parent_id}";

/// Returns the plural suffix for a resource name: `es` after `us`, else `s`.
#[must_use]
pub fn plural_ending(name: &str) -> &'static str {
    if name.ends_with("us") {
        "es"
    } else {
        "s"
    }
}

/// Pluralizes a resource name.
///
/// This is a fixed heuristic, not English pluralization: the Hub routes are
/// named with exactly this rule.
#[must_use]
pub fn pluralize(name: &str) -> String {
    format!("{name}{}", plural_ending(name))
}

/// Builds the collection path template for a resource.
#[must_use]
pub fn build_resource_path(resource: &str, parent: Option<&str>) -> String {
    match parent {
        Some(parent) => format!(
            "{API_PREFIX}/{}/{PARENT_ID_PLACEHOLDER}/{}",
            pluralize(parent),
            pluralize(resource)
        ),
        None => format!("{API_PREFIX}/{}", pluralize(resource)),
    }
}

/// Returns the argument name carrying a parent identifier, e.g. `project_id`.
#[must_use]
pub fn parent_id_key(parent: &str) -> String {
    format!("{parent}_id")
}

/// Renders an identifier value as a percent-encoded path segment.
///
/// Strings, numbers and booleans are accepted; empty strings, null and
/// compound values are not.
#[must_use]
pub fn path_segment(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    Some(urlencoding::encode(&raw).into_owned())
}

/// Fills the parent placeholder of `template` from `params`.
///
/// Without a parent the template is returned unchanged and any parent id in
/// `params` is ignored.
///
/// # Errors
///
/// Returns an [`ErrorKind::MissingParam`](crate::ErrorKind::MissingParam)
/// error if a parent is declared but `<parent>_id` is absent or empty.
pub fn resolve_path(
    template: &str,
    parent: Option<&str>,
    params: &Map<String, Value>,
) -> Result<String, ApiError> {
    let Some(parent) = parent else {
        return Ok(template.to_string());
    };

    let key = parent_id_key(parent);
    let parent_id = params
        .get(&key)
        .and_then(path_segment)
        .ok_or_else(|| ApiError::missing_param(format!("{key} parameter is required")))?;

    Ok(template.replace(PARENT_ID_PLACEHOLDER, &parent_id))
}

/// Appends an encoded member identifier to a collection path.
#[must_use]
pub fn member_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}", urlencoding::encode(id))
}
