//! Endpoint generation from a resource schema.
//!
//! [`EndpointRegistry::build`] walks an [`ApiSchema`] once and produces one
//! [`Operation`] per (resource, action) pair, keyed by a name derived from
//! the resource and action alone:
//!
//! | Action            | Operation names                          | Request                          |
//! |-------------------|------------------------------------------|----------------------------------|
//! | `index`           | `get_<plural>`, `iterate_all_<plural>`   | GET `{path}` with limit/offset   |
//! | `show`            | `get_<resource>`                         | GET `{path}/{id}`                |
//! | `create`          | `create_<resource>`                      | POST `{path}`                    |
//! | `update`          | `update_<resource>`                      | PATCH `{path}/{id}` or `{path}`  |
//! | `delete`          | `delete_<resource>`                      | DELETE `{path}/{id}`             |
//! | `{name: verb}`    | `<name>_<resource>`                      | verb `{path}/{id}/{name}`        |
//!
//! The registry belongs to one client instance. Two clients built from
//! different schemas never see each other's operations.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::clients::{ApiError, HttpMethod, HttpRequest};
use crate::error::ConfigError;
use crate::rest::args::OperationArgs;
use crate::rest::path::{build_resource_path, member_path, pluralize, resolve_path};
use crate::rest::schema::{Action, ApiSchema};

/// Default page size of index operations.
pub const DEFAULT_LIMIT: u64 = 50;

/// What a generated operation does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationKind {
    /// One page of the collection.
    Index,
    /// Every page of the collection, item by item.
    IterateAll,
    /// One member.
    Show,
    /// New member.
    Create,
    /// Member or bulk update.
    Update,
    /// Member removal.
    Delete,
    /// Custom member action.
    Custom {
        /// Action name, used as the last path segment.
        action: String,
        /// HTTP method of the action.
        method: HttpMethod,
    },
}

impl OperationKind {
    /// Returns the HTTP method the operation is sent with.
    #[must_use]
    pub const fn http_method(&self) -> HttpMethod {
        match self {
            Self::Index | Self::IterateAll | Self::Show => HttpMethod::Get,
            Self::Create => HttpMethod::Post,
            Self::Update => HttpMethod::Patch,
            Self::Delete => HttpMethod::Delete,
            Self::Custom { method, .. } => *method,
        }
    }
}

/// A generated operation bound to its resource and path template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    name: String,
    kind: OperationKind,
    resource: String,
    parent: Option<String>,
    path_template: String,
}

impl Operation {
    /// Returns the operation name, e.g. `create_experiment`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns what the operation does.
    #[must_use]
    pub const fn kind(&self) -> &OperationKind {
        &self.kind
    }

    /// Returns the resource name.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the parent resource name, if the resource is nested.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Returns the collection path template.
    #[must_use]
    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    /// Builds the HTTP request for one call of this operation.
    ///
    /// No network access happens here, so every argument error surfaces
    /// before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::MissingParam`](crate::ErrorKind::MissingParam)
    /// error if the parent id or a required member id is missing.
    pub fn prepare(&self, args: &OperationArgs) -> Result<HttpRequest, ApiError> {
        let params = args.params_map();
        let collection = resolve_path(&self.path_template, self.parent.as_deref(), params)?;
        let method = self.kind.http_method();

        let (path, payload) = match &self.kind {
            OperationKind::Index | OperationKind::IterateAll => {
                let mut payload = Map::new();
                payload.insert("limit".to_string(), Value::from(DEFAULT_LIMIT));
                payload.insert("offset".to_string(), Value::from(0));
                payload.extend(params.clone());
                (collection, payload)
            }
            OperationKind::Show | OperationKind::Delete => {
                (member_path(&collection, require_id(args)?), Map::new())
            }
            OperationKind::Create => (collection, params.clone()),
            OperationKind::Update => {
                let path = match args.member_id().filter(|id| !id.is_empty()) {
                    Some(id) => member_path(&collection, id),
                    None => collection,
                };
                (path, params.clone())
            }
            OperationKind::Custom { action, .. } => {
                let member = member_path(&collection, require_id(args)?);
                (format!("{member}/{action}"), params.clone())
            }
        };

        Ok(HttpRequest::builder(method, path).payload(payload).build())
    }
}

fn require_id(args: &OperationArgs) -> Result<&str, ApiError> {
    args.member_id()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::missing_param("id parameter is required"))
}

/// The operations generated for one client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointRegistry {
    operations: BTreeMap<String, Operation>,
}

impl EndpointRegistry {
    /// Generates every operation the schema declares.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSchema`] for a resource, parent or
    /// custom action name that is not a lowercase identifier or that shadows
    /// a standard action, and
    /// [`ConfigError::DuplicateOperation`] when two entries generate the
    /// same operation name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hub_api_client::rest::{Action, ApiSchema, EndpointRegistry, ResourceSchema};
    ///
    /// let schema = ApiSchema::new().resource(
    ///     ResourceSchema::new("widget").actions([Action::Index, Action::Show, Action::Create]),
    /// );
    /// let registry = EndpointRegistry::build(&schema).unwrap();
    ///
    /// let names: Vec<&str> = registry.operation_names().collect();
    /// assert_eq!(names, ["create_widget", "get_widget", "get_widgets", "iterate_all_widgets"]);
    /// ```
    pub fn build(schema: &ApiSchema) -> Result<Self, ConfigError> {
        let mut registry = Self::default();

        for resource in schema.resources() {
            let name = resource.name();
            validate_identifier(name, name)?;
            if let Some(parent) = resource.parent_name() {
                validate_identifier(name, parent)?;
            }

            let template = build_resource_path(name, resource.parent_name());
            let make = |op_name: String, kind: OperationKind| Operation {
                name: op_name,
                kind,
                resource: name.to_string(),
                parent: resource.parent_name().map(str::to_string),
                path_template: template.clone(),
            };

            for action in resource.action_list() {
                match action {
                    Action::Index => {
                        let plural = pluralize(name);
                        registry.insert(make(format!("get_{plural}"), OperationKind::Index))?;
                        registry.insert(make(
                            format!("iterate_all_{plural}"),
                            OperationKind::IterateAll,
                        ))?;
                    }
                    Action::Show => {
                        registry.insert(make(format!("get_{name}"), OperationKind::Show))?;
                    }
                    Action::Create => {
                        registry.insert(make(format!("create_{name}"), OperationKind::Create))?;
                    }
                    Action::Update => {
                        registry.insert(make(format!("update_{name}"), OperationKind::Update))?;
                    }
                    Action::Delete => {
                        registry.insert(make(format!("delete_{name}"), OperationKind::Delete))?;
                    }
                    Action::Custom {
                        name: action_name,
                        method,
                    } => {
                        validate_identifier(name, action_name)?;
                        if Action::standard(action_name).is_some() {
                            return Err(ConfigError::InvalidSchema {
                                resource: name.to_string(),
                                reason: format!(
                                    "custom action `{action_name}` shadows a standard action"
                                ),
                            });
                        }
                        registry.insert(make(
                            format!("{action_name}_{name}"),
                            OperationKind::Custom {
                                action: action_name.clone(),
                                method: *method,
                            },
                        ))?;
                    }
                }
            }
        }

        tracing::debug!(
            operations = registry.operations.len(),
            "Generated Hub API operations"
        );

        Ok(registry)
    }

    fn insert(&mut self, operation: Operation) -> Result<(), ConfigError> {
        if self.operations.contains_key(&operation.name) {
            return Err(ConfigError::DuplicateOperation {
                name: operation.name,
            });
        }
        self.operations.insert(operation.name.clone(), operation);
        Ok(())
    }

    /// Looks up an operation by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// Returns `true` if an operation with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Returns the operation names in sorted order.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Returns the operations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    /// Returns the number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the schema generated no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

fn validate_identifier(resource: &str, name: &str) -> Result<(), ConfigError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidSchema {
            resource: resource.to_string(),
            reason: format!("`{name}` is not a valid name"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ErrorKind;
    use crate::rest::schema::ResourceSchema;
    use serde_json::json;

    fn registry(schema: ApiSchema) -> EndpointRegistry {
        EndpointRegistry::build(&schema).unwrap()
    }

    #[test]
    fn test_widget_schema_generates_exact_operations() {
        let registry = registry(ApiSchema::from_json(&json!({
            "widget": {"actions": ["index", "show", "create"]}
        }))
        .unwrap());

        let names: Vec<&str> = registry.operation_names().collect();
        assert_eq!(
            names,
            vec![
                "create_widget",
                "get_widget",
                "get_widgets",
                "iterate_all_widgets"
            ]
        );
    }

    #[test]
    fn test_naming_uses_pluralization_rule() {
        let registry = registry(
            ApiSchema::new()
                .resource(ResourceSchema::new("cluster_status").action(Action::Index))
                .resource(
                    ResourceSchema::new("project")
                        .actions([Action::Update, Action::Delete])
                        .custom("deploy", HttpMethod::Patch),
                ),
        );

        assert!(registry.contains("get_cluster_statuses"));
        assert!(registry.contains("iterate_all_cluster_statuses"));
        assert!(registry.contains("update_project"));
        assert!(registry.contains("delete_project"));
        assert!(registry.contains("deploy_project"));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_duplicate_operation_is_rejected() {
        let result = EndpointRegistry::build(
            &ApiSchema::new()
                .resource(ResourceSchema::new("widget").action(Action::Show))
                .resource(ResourceSchema::new("widget").action(Action::Show)),
        );

        assert!(matches!(
            result,
            Err(ConfigError::DuplicateOperation { name }) if name == "get_widget"
        ));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        for schema in [
            ApiSchema::new().resource(ResourceSchema::new("").action(Action::Index)),
            ApiSchema::new().resource(ResourceSchema::new("Widget").action(Action::Index)),
            ApiSchema::new().resource(
                ResourceSchema::new("widget")
                    .parent("bad/parent")
                    .action(Action::Index),
            ),
            ApiSchema::new()
                .resource(ResourceSchema::new("widget").custom("go/away", HttpMethod::Post)),
        ] {
            assert!(matches!(
                EndpointRegistry::build(&schema),
                Err(ConfigError::InvalidSchema { .. })
            ));
        }
    }

    #[test]
    fn test_custom_action_cannot_shadow_standard_action() {
        let result = EndpointRegistry::build(
            &ApiSchema::new()
                .resource(ResourceSchema::new("widget").custom("index", HttpMethod::Post)),
        );

        assert!(matches!(
            result,
            Err(ConfigError::InvalidSchema { ref resource, ref reason })
                if resource == "widget" && reason.contains("shadows")
        ));
    }

    #[test]
    fn test_hub_schema_generates_deviation_targets() {
        let registry = registry(ApiSchema::hub());

        for name in [
            "update_trial",
            "get_project_file_urls",
            "create_project_file_url",
            "deploy_project",
            "undeploy_project",
            "get_cluster_statuses",
            "iterate_all_pod_logs",
            "create_token",
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert!(!registry.contains("delete_trial"));
    }

    #[test]
    fn test_index_request_applies_default_pagination() {
        let registry = registry(
            ApiSchema::new().resource(ResourceSchema::new("experiment").action(Action::Index)),
        );
        let op = registry.get("get_experiments").unwrap();

        let request = op.prepare(&OperationArgs::new()).unwrap();
        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.path, "/api/v1/experiments");
        assert_eq!(request.payload["limit"], json!(50));
        assert_eq!(request.payload["offset"], json!(0));

        let request = op
            .prepare(&OperationArgs::new().param("limit", 10).param("project_id", 4))
            .unwrap();
        assert_eq!(request.payload["limit"], json!(10));
        assert_eq!(request.payload["offset"], json!(0));
        assert_eq!(request.payload["project_id"], json!(4));
    }

    #[test]
    fn test_member_requests() {
        let registry = registry(
            ApiSchema::new().resource(
                ResourceSchema::new("project")
                    .actions([Action::Show, Action::Create, Action::Update, Action::Delete])
                    .custom("deploy", HttpMethod::Patch),
            ),
        );

        let show = registry
            .get("get_project")
            .unwrap()
            .prepare(&OperationArgs::with_id(3))
            .unwrap();
        assert_eq!((show.http_method, show.path.as_str()), (HttpMethod::Get, "/api/v1/projects/3"));
        assert!(show.payload.is_empty());

        let create = registry
            .get("create_project")
            .unwrap()
            .prepare(&OperationArgs::new().param("name", "p"))
            .unwrap();
        assert_eq!((create.http_method, create.path.as_str()), (HttpMethod::Post, "/api/v1/projects"));
        assert_eq!(create.payload["name"], json!("p"));

        let update = registry
            .get("update_project")
            .unwrap()
            .prepare(&OperationArgs::with_id(3).param("name", "q"))
            .unwrap();
        assert_eq!((update.http_method, update.path.as_str()), (HttpMethod::Patch, "/api/v1/projects/3"));

        let bulk = registry
            .get("update_project")
            .unwrap()
            .prepare(&OperationArgs::new().param("name", "q"))
            .unwrap();
        assert_eq!(bulk.path, "/api/v1/projects");

        let empty_id = registry
            .get("update_project")
            .unwrap()
            .prepare(&OperationArgs::new().id("").param("name", "q"))
            .unwrap();
        assert_eq!(empty_id.path, "/api/v1/projects");

        let delete = registry
            .get("delete_project")
            .unwrap()
            .prepare(&OperationArgs::with_id(3))
            .unwrap();
        assert_eq!((delete.http_method, delete.path.as_str()), (HttpMethod::Delete, "/api/v1/projects/3"));

        let deploy = registry
            .get("deploy_project")
            .unwrap()
            .prepare(&OperationArgs::with_id(3).param("worker_type_id", 1))
            .unwrap();
        assert_eq!(
            (deploy.http_method, deploy.path.as_str()),
            (HttpMethod::Patch, "/api/v1/projects/3/deploy")
        );
        assert_eq!(deploy.payload["worker_type_id"], json!(1));
    }

    #[test]
    fn test_member_requests_require_id() {
        let registry = registry(
            ApiSchema::new().resource(
                ResourceSchema::new("project")
                    .actions([Action::Show, Action::Delete])
                    .custom("deploy", HttpMethod::Patch),
            ),
        );

        for name in ["get_project", "delete_project", "deploy_project"] {
            let error = registry
                .get(name)
                .unwrap()
                .prepare(&OperationArgs::new())
                .unwrap_err();
            assert_eq!(error.kind(), ErrorKind::MissingParam, "{name}");
        }
    }

    #[test]
    fn test_nested_operations_require_parent_id() {
        let registry = registry(
            ApiSchema::new().resource(
                ResourceSchema::new("trial")
                    .parent("project_run")
                    .actions([Action::Index, Action::Show, Action::Create, Action::Update]),
            ),
        );

        for name in ["get_trials", "get_trial", "create_trial", "update_trial"] {
            let error = registry
                .get(name)
                .unwrap()
                .prepare(&OperationArgs::with_id(1))
                .unwrap_err();
            assert_eq!(error.kind(), ErrorKind::MissingParam, "{name}");
            assert_eq!(error.message(), "project_run_id parameter is required");
        }

        let request = registry
            .get("get_trial")
            .unwrap()
            .prepare(&OperationArgs::with_id(9).parent_id("project_run", 2))
            .unwrap();
        assert_eq!(request.path, "/api/v1/project_runs/2/trials/9");
    }

    #[test]
    fn test_registries_are_independent() {
        let first = registry(
            ApiSchema::new().resource(ResourceSchema::new("widget").action(Action::Show)),
        );
        let second = registry(
            ApiSchema::new().resource(ResourceSchema::new("gadget").action(Action::Show)),
        );

        assert!(first.contains("get_widget") && !first.contains("get_gadget"));
        assert!(second.contains("get_gadget") && !second.contains("get_widget"));
    }
}
