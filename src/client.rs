//! The Hub API client.
//!
//! [`HubApiClient`] ties the pieces together: it owns an [`EndpointRegistry`]
//! generated from a schema, and an [`HttpClient`] built from a [`HubConfig`].
//! Generated operations are invoked by name through [`HubApiClient::call`]
//! and [`HubApiClient::iterate_all`]. The Hub endpoints that do not follow
//! the REST naming rules have dedicated methods.

use std::fmt::Display;

use serde_json::{Map, Value};

use crate::clients::{
    ApiError, BodyEncoding, HttpClient, HttpMethod, HttpRequest, ResponseBody, ResponseMode,
    RetryCounter, Service,
};
use crate::config::HubConfig;
use crate::error::ConfigError;
use crate::rest::{
    iterate_pages, member_path, ApiSchema, EndpointRegistry, Operation, OperationArgs,
    OperationKind, API_PREFIX,
};

/// Client for the Hub REST API.
///
/// Each client owns its operations. Two clients built from different
/// schemas are fully independent.
///
/// # Thread Safety
///
/// `HubApiClient` is `Send + Sync`. Calls keep their retry state on the
/// stack, so one client can serve concurrent tasks.
///
/// # Example
///
/// ```rust,no_run
/// use hub_api_client::{ApiToken, HubApiClient, HubConfig, HubUrl, OperationArgs};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = HubConfig::builder()
///     .hub_url(HubUrl::new("https://hub.example.com")?)
///     .system_token(ApiToken::new("secret")?)
///     .build()?;
/// let client = HubApiClient::hub(config)?;
///
/// let project = client.call("get_project", OperationArgs::with_id(12)).await?;
/// println!("{}", project["name"]);
///
/// client
///     .iterate_all("iterate_all_experiments", OperationArgs::new(), |experiment| {
///         println!("{}", experiment["id"]);
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HubApiClient {
    config: HubConfig,
    http_client: HttpClient,
    registry: EndpointRegistry,
}

// Verify HubApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HubApiClient>();
};

impl HubApiClient {
    /// Creates a client whose operations are generated from `schema`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the schema cannot be turned into a
    /// consistent set of operations.
    pub fn new(config: HubConfig, schema: &ApiSchema) -> Result<Self, ConfigError> {
        let registry = EndpointRegistry::build(schema)?;
        let http_client = HttpClient::new(&config);

        Ok(Self {
            config,
            http_client,
            registry,
        })
    }

    /// Creates a client for the built-in Hub schema.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the built-in schema fails to generate.
    pub fn hub(config: HubConfig) -> Result<Self, ConfigError> {
        Self::new(config, &ApiSchema::hub())
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Returns the generated operations.
    #[must_use]
    pub const fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Lists the generated operation names in sorted order.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.registry.operation_names()
    }

    /// Returns `true` if an operation with this name was generated.
    #[must_use]
    pub fn has_operation(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    fn operation(&self, name: &str) -> Result<&Operation, ApiError> {
        self.registry
            .get(name)
            .ok_or_else(|| ApiError::fatal(format!("unknown operation '{name}'")))
    }

    /// Invokes a generated operation and returns the response JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Fatal`](crate::ErrorKind::Fatal) for an unknown
    /// name or an `iterate_all_*` operation, which needs
    /// [`iterate_all`](Self::iterate_all). Otherwise returns the error of the
    /// request, including [`ErrorKind::MissingParam`](crate::ErrorKind::MissingParam)
    /// raised before anything is sent.
    pub async fn call(&self, name: &str, args: OperationArgs) -> Result<Value, ApiError> {
        let operation = self.operation(name)?;
        if operation.kind() == &OperationKind::IterateAll {
            return Err(ApiError::fatal(format!(
                "'{name}' walks every page, use iterate_all"
            )));
        }

        let request = operation.prepare(&args)?;
        Ok(self.http_client.request(request).await?.into_json())
    }

    /// Walks every page of an index operation, handing items to `handler`.
    ///
    /// `name` may be either the `iterate_all_<plural>` operation or its
    /// `get_<plural>` counterpart. A `limit` in `args` sets the page size;
    /// the offset is managed here.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Fatal`](crate::ErrorKind::Fatal) for an unknown
    /// or non-index operation and for a malformed page, or the first error of
    /// any page request.
    pub async fn iterate_all<H>(
        &self,
        name: &str,
        args: OperationArgs,
        handler: H,
    ) -> Result<(), ApiError>
    where
        H: FnMut(Value),
    {
        let operation = self.operation(name)?;
        if !matches!(
            operation.kind(),
            OperationKind::Index | OperationKind::IterateAll
        ) {
            return Err(ApiError::fatal(format!("'{name}' is not an index operation")));
        }
        let request = operation.prepare(&args)?;

        iterate_pages(
            |offset| {
                let mut page_request = request.clone();
                page_request
                    .payload
                    .insert("offset".to_string(), Value::from(offset));
                async move {
                    self.http_client
                        .request(page_request)
                        .await
                        .map(ResponseBody::into_json)
                }
            },
            handler,
        )
        .await
    }

    /// Sends a prepared request through the executor.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the request.
    pub async fn request(&self, request: HttpRequest) -> Result<ResponseBody, ApiError> {
        self.http_client.request(request).await
    }

    /// Sends a GET with `payload` to an arbitrary Hub path.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the request.
    pub async fn get(&self, path: &str, payload: Map<String, Value>) -> Result<Value, ApiError> {
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .payload(payload)
            .build();
        Ok(self.http_client.request(request).await?.into_json())
    }

    /// Updates trials in bulk: PATCH on the trials collection.
    ///
    /// # Errors
    ///
    /// Returns the error of the `update_trial` operation.
    pub async fn update_trials(&self, params: Map<String, Value>) -> Result<Value, ApiError> {
        self.call("update_trial", OperationArgs::new().params(params))
            .await
    }

    /// Fetches a project's logs as plain text.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the request.
    pub async fn get_project_logs(&self, project_id: impl Display) -> Result<String, ApiError> {
        let path = format!(
            "{}/logs",
            member_path(&format!("{API_PREFIX}/projects"), &project_id.to_string())
        );
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .response_mode(ResponseMode::PlainText)
            .build();
        Ok(self.http_client.request(request).await?.into_text())
    }

    /// Lists project file URLs. Same as the `get_project_file_urls` operation.
    ///
    /// # Errors
    ///
    /// Returns the error of the `get_project_file_urls` operation.
    pub async fn get_project_file_url(&self, params: Map<String, Value>) -> Result<Value, ApiError> {
        self.call("get_project_file_urls", OperationArgs::new().params(params))
            .await
    }

    /// Fetches the status of a Hub object.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the request.
    pub async fn get_status(
        &self,
        object: &str,
        id: impl Into<Value>,
    ) -> Result<Value, ApiError> {
        let request = HttpRequest::builder(HttpMethod::Get, format!("{API_PREFIX}/status"))
            .param("object", object)
            .param("id", id)
            .build();
        Ok(self.http_client.request(request).await?.into_json())
    }

    /// Asks the optimizers service for the next trials.
    ///
    /// The payload is sent gzip-compressed. Although this is a POST, it is
    /// retried with the configured budgets.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingParam`](crate::ErrorKind::MissingParam) if
    /// no `optimizers_url` is configured, or the classified error of the
    /// request.
    pub async fn get_next_trials(&self, payload: Map<String, Value>) -> Result<Value, ApiError> {
        let request = HttpRequest::builder(HttpMethod::Post, "/next_trials")
            .payload(payload)
            .service(Service::Optimizers)
            .body_encoding(BodyEncoding::Gzip)
            .retry_counter(RetryCounter::from_config(&self.config))
            .build();
        Ok(self.http_client.request(request).await?.into_json())
    }
}
