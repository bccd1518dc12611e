//! Configuration and schema error types for the Hub API client.
//!
//! Everything in this module is raised while a client is being built: an
//! invalid URL, a missing credential under mandatory auth, or a malformed
//! resource schema. None of these errors can occur once a request is in flight.
//!
//! # Example
//!
//! ```rust
//! use hub_api_client::{ApiToken, ConfigError};
//!
//! let result = ApiToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyToken)));
//! ```

use thiserror::Error;

/// Errors raised while building a configuration, schema or client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A credential token was empty.
    #[error("API token cannot be empty. Omit the credential instead of passing an empty value.")]
    EmptyToken,

    /// A base URL could not be parsed or has no http(s) scheme.
    #[error("Invalid URL '{url}'. Please provide an absolute URL with scheme (e.g., 'https://hub.example.com').")]
    InvalidUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Mandatory authentication is configured but no credential was supplied.
    #[error("Expected at least one of project, cluster, session or system token to be configured.")]
    MissingCredentials,

    /// The resource schema contains an entry the generator cannot interpret.
    #[error("Unsupported action in DSL for '{resource}': {reason}")]
    InvalidSchema {
        /// The resource whose entry is malformed.
        resource: String,
        /// What is wrong with the entry.
        reason: String,
    },

    /// Two schema entries produce an operation with the same name.
    #[error("Operation '{name}' is generated more than once by the resource schema.")]
    DuplicateOperation {
        /// The clashing operation name.
        name: String,
    },
}
