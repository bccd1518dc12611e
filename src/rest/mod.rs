//! Schema-driven REST endpoints for the Hub API.
//!
//! This module turns a declarative [`ApiSchema`] into callable operations:
//!
//! - **Paths**: [`build_resource_path`] and [`resolve_path`] derive collection
//!   paths from resource names, nesting under a parent when declared
//! - **Schema**: [`ApiSchema`], [`ResourceSchema`] and [`Action`] describe
//!   which resources exist and what they support
//! - **Operations**: [`EndpointRegistry`] generates one named [`Operation`]
//!   per resource action, and [`Operation::prepare`] turns
//!   [`OperationArgs`] into an [`HttpRequest`](crate::clients::HttpRequest)
//! - **Pagination**: [`iterate_pages`] walks an index operation page by page
//!
//! # Example
//!
//! ```rust
//! use hub_api_client::rest::{ApiSchema, EndpointRegistry, OperationArgs};
//! use hub_api_client::clients::HttpMethod;
//!
//! let registry = EndpointRegistry::build(&ApiSchema::hub()).unwrap();
//! let deploy = registry.get("deploy_project").unwrap();
//!
//! let request = deploy.prepare(&OperationArgs::with_id(12)).unwrap();
//! assert_eq!(request.http_method, HttpMethod::Patch);
//! assert_eq!(request.path, "/api/v1/projects/12/deploy");
//! ```

mod args;
mod pagination;
mod path;
mod registry;
mod schema;

pub use args::OperationArgs;
pub use pagination::{iterate_pages, Page, PageMeta, Pagination};
pub use path::{
    build_resource_path, member_path, parent_id_key, path_segment, plural_ending, pluralize,
    resolve_path, API_PREFIX, PARENT_ID_PLACEHOLDER,
};
pub use registry::{EndpointRegistry, Operation, OperationKind, DEFAULT_LIMIT};
pub use schema::{Action, ApiSchema, ResourceSchema};
