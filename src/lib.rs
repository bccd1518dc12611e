//! # Hub API Client
//!
//! An async Rust client for the Hub REST API, generated from a declarative
//! resource schema.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`HubConfig`] and [`HubConfigBuilder`], or
//!   deserialized deployment settings via [`HubSettings`]
//! - Validated newtypes for credentials and service URLs
//! - Credential selection by fixed priority (project, cluster, session, system)
//! - A request executor that classifies responses and retries transient failures
//! - Operations generated from an [`ApiSchema`] and invoked by name
//! - Offset pagination over index operations
//!
//! ## Quick Start
//!
//! ```rust
//! use hub_api_client::{ApiToken, HubApiClient, HubConfig, HubUrl};
//!
//! let config = HubConfig::builder()
//!     .hub_url(HubUrl::new("https://hub.example.com").unwrap())
//!     .project_api_token(ApiToken::new("project-token").unwrap())
//!     .retries_count(3)
//!     .build()
//!     .unwrap();
//!
//! let client = HubApiClient::hub(config).unwrap();
//! assert!(client.has_operation("deploy_project"));
//! assert!(client.has_operation("iterate_all_experiments"));
//! ```
//!
//! ## Custom Schemas
//!
//! A schema can be written in code or loaded from the Hub's JSON DSL:
//!
//! ```rust
//! use hub_api_client::{ApiSchema, HubApiClient, HubConfig, HubUrl};
//! use serde_json::json;
//!
//! let schema = ApiSchema::from_json(&json!({
//!     "widget": {"actions": ["index", "show", "create"]},
//!     "part": {"actions": ["index"], "parent_resource": "widget"}
//! }))
//! .unwrap();
//!
//! let config = HubConfig::builder()
//!     .hub_url(HubUrl::new("http://localhost:5000").unwrap())
//!     .build()
//!     .unwrap();
//! let client = HubApiClient::new(config, &schema).unwrap();
//!
//! let names: Vec<&str> = client.operation_names().collect();
//! assert_eq!(
//!     names,
//!     [
//!         "create_widget",
//!         "get_parts",
//!         "get_widget",
//!         "get_widgets",
//!         "iterate_all_parts",
//!         "iterate_all_widgets",
//!     ]
//! );
//! ```
//!
//! ## Error Handling
//!
//! Every request returns `Result<_, ApiError>`; match on [`ApiError::kind`]:
//!
//! ```rust,no_run
//! use hub_api_client::{ErrorKind, HubApiClient, OperationArgs};
//!
//! # async fn run(client: &HubApiClient) {
//! match client.call("create_experiment", OperationArgs::new()).await {
//!     Ok(experiment) => println!("created {}", experiment["id"]),
//!     Err(e) if e.kind() == ErrorKind::InvalidParams => {
//!         println!("rejected fields: {:?}", e.error_params());
//!     }
//!     Err(e) => println!("request failed: {e}"),
//! }
//! # }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: each client owns its configuration and operations
//! - **Fail-fast validation**: newtypes and schemas are validated on construction
//! - **Thread-safe**: all public client types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio async runtime

pub mod auth;
pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use auth::{AuthPolicy, Credentials};
pub use client::HubApiClient;
pub use config::{
    ApiToken, HubConfig, HubConfigBuilder, HubSettings, HubUrl, DEFAULT_RETRIES_COUNT,
    DEFAULT_RETRY_WAIT_SECONDS,
};
pub use error::ConfigError;

// Re-export request types
pub use clients::{
    ApiError, ErrorKind, HttpClient, HttpMethod, HttpRequest, ResponseBody, ResponseMode,
    RetryCounter,
};

// Re-export schema and operation types
pub use rest::{Action, ApiSchema, EndpointRegistry, OperationArgs, ResourceSchema};
