//! Declarative resource schema.
//!
//! A schema lists resources, the actions each supports, and optionally the
//! parent resource it is nested under. It can be built in code or loaded
//! from a JSON table in the Hub's DSL:
//!
//! ```json
//! {
//!   "project": { "actions": ["index", "show", {"deploy": "patch"}] },
//!   "trial":   { "actions": ["index", "update"], "parent_resource": "project_run" }
//! }
//! ```
//!
//! Each action is either a standard name (`index`, `show`, `create`,
//! `update`, `delete`) or a `{name: verb}` mapping declaring a custom
//! member action. Anything else is rejected when the schema is loaded.

use serde::Deserialize;
use serde_json::Value;

use crate::clients::HttpMethod;
use crate::error::ConfigError;

/// One action a resource supports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Paginated list of the collection.
    Index,
    /// Single member by id.
    Show,
    /// New member.
    Create,
    /// Member update, or bulk update without an id.
    Update,
    /// Member removal.
    Delete,
    /// A custom member action sent with `method` to `{path}/{id}/{name}`.
    Custom {
        /// Action name, used as the last path segment.
        name: String,
        /// HTTP method of the action.
        method: HttpMethod,
    },
}

impl Action {
    /// Names accepted for the standard actions.
    pub const STANDARD_NAMES: [&'static str; 5] = ["index", "show", "create", "update", "delete"];

    /// Parses a standard action name.
    #[must_use]
    pub fn standard(name: &str) -> Option<Self> {
        match name {
            "index" => Some(Self::Index),
            "show" => Some(Self::Show),
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Creates a custom action.
    #[must_use]
    pub fn custom(name: impl Into<String>, method: HttpMethod) -> Self {
        Self::Custom {
            name: name.into(),
            method,
        }
    }

    /// Returns the action name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Index => "index",
            Self::Show => "show",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Custom { name, .. } => name,
        }
    }
}

/// A resource entry of the schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceSchema {
    name: String,
    actions: Vec<Action>,
    parent: Option<String>,
}

impl ResourceSchema {
    /// Starts a resource entry with no actions.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
            parent: None,
        }
    }

    /// Adds an action.
    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds several actions.
    #[must_use]
    pub fn actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Adds a custom member action.
    #[must_use]
    pub fn custom(self, name: impl Into<String>, method: HttpMethod) -> Self {
        self.action(Action::custom(name, method))
    }

    /// Nests the resource under a parent resource.
    #[must_use]
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Returns the resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared actions in order.
    #[must_use]
    pub fn action_list(&self) -> &[Action] {
        &self.actions
    }

    /// Returns the parent resource name, if nested.
    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

/// The full resource schema a client is generated from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiSchema {
    resources: Vec<ResourceSchema>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawResource {
    actions: Vec<Value>,
    #[serde(default)]
    parent_resource: Option<String>,
}

impl ApiSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource entry.
    #[must_use]
    pub fn resource(mut self, resource: ResourceSchema) -> Self {
        self.resources.push(resource);
        self
    }

    /// Returns the resource entries in the order they were added.
    ///
    /// Schemas loaded with [`from_json`](Self::from_json) list resources
    /// sorted by name.
    #[must_use]
    pub fn resources(&self) -> &[ResourceSchema] {
        &self.resources
    }

    /// Loads a schema from its JSON DSL form.
    ///
    /// Resources are added in name order, whatever the order of the JSON keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSchema`] for a malformed entry: a
    /// non-object table, an unknown standard action, a custom action with an
    /// unknown verb or a standard name, or any other action shape.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hub_api_client::rest::{Action, ApiSchema};
    /// use hub_api_client::clients::HttpMethod;
    /// use serde_json::json;
    ///
    /// let schema = ApiSchema::from_json(&json!({
    ///     "project": {"actions": ["show", {"deploy": "patch"}]}
    /// })).unwrap();
    ///
    /// let project = &schema.resources()[0];
    /// assert_eq!(project.action_list()[1], Action::custom("deploy", HttpMethod::Patch));
    /// ```
    pub fn from_json(table: &Value) -> Result<Self, ConfigError> {
        let entries = table.as_object().ok_or_else(|| ConfigError::InvalidSchema {
            resource: String::new(),
            reason: "schema must be an object of resources".to_string(),
        })?;

        let mut schema = Self::new();
        for (name, options) in entries {
            let invalid = |reason: String| ConfigError::InvalidSchema {
                resource: name.clone(),
                reason,
            };

            let raw: RawResource =
                serde_json::from_value(options.clone()).map_err(|e| invalid(e.to_string()))?;

            let mut resource = ResourceSchema::new(name.clone());
            if let Some(parent) = raw.parent_resource {
                resource = resource.parent(parent);
            }
            for action in &raw.actions {
                resource = resource.actions(parse_action(action).map_err(invalid)?);
            }
            schema = schema.resource(resource);
        }

        Ok(schema)
    }

    /// The built-in Hub API schema.
    #[must_use]
    pub fn hub() -> Self {
        use Action::{Create, Delete, Index, Show, Update};

        let entry = |name: &str, actions: &[Action]| {
            ResourceSchema::new(name).actions(actions.iter().cloned())
        };

        Self::new()
            .resource(entry("cluster", &[Index, Show, Create, Delete]))
            .resource(entry("cluster_task", &[Index, Show, Create]))
            .resource(entry("cluster_status", &[Index]))
            .resource(entry("dataset_manifest", &[Index, Show, Create, Update]))
            .resource(entry("experiment", &[Index, Show, Create, Update, Delete]))
            .resource(entry("experiment_session", &[Index, Show, Create, Update]))
            .resource(entry("hyperparameter", &[Index, Show, Create]))
            .resource(entry("instance_type", &[Index]))
            .resource(entry("organization", &[Index, Show, Create, Update, Delete]))
            .resource(entry("pipeline", &[Index, Show, Create, Update]))
            .resource(entry("pipeline_file", &[Index, Show, Create]))
            .resource(entry("prediction", &[Index, Show, Create]))
            .resource(
                entry("project", &[Index, Show, Create, Update, Delete])
                    .custom("deploy", HttpMethod::Patch)
                    .custom("undeploy", HttpMethod::Patch),
            )
            .resource(entry("project_file", &[Index, Show, Create, Delete]))
            .resource(entry("project_file_url", &[Create, Index]))
            .resource(entry("pod_log", &[Index]))
            .resource(entry("similar_trials_request", &[Show, Create]))
            .resource(entry("token", &[Create]))
            .resource(entry("trial", &[Index, Show, Update]))
            .resource(entry("warm_start_request", &[Show, Create]))
    }
}

/// Parses one DSL action. A mapping may declare several custom actions.
fn parse_action(action: &Value) -> Result<Vec<Action>, String> {
    match action {
        Value::String(name) => Action::standard(name)
            .map(|a| vec![a])
            .ok_or_else(|| format!("unsupported REST action `{name}`")),
        Value::Object(custom) if !custom.is_empty() => custom
            .iter()
            .map(|(name, verb)| {
                if Action::standard(name).is_some() {
                    return Err(format!("custom action `{name}` shadows a standard action"));
                }
                let method = verb
                    .as_str()
                    .ok_or_else(|| format!("verb of custom action `{name}` must be a string"))?
                    .parse::<HttpMethod>()?;
                Ok(Action::custom(name.clone(), method))
            })
            .collect(),
        other => Err(format!("unsupported action `{other}`")),
    }
}
