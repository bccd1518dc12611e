//! Integration tests for generated operations and the Hub-specific endpoints.

use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;
use hub_api_client::{
    ApiSchema, ApiToken, ErrorKind, HubApiClient, HubConfig, HubUrl, OperationArgs,
};
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> HubConfig {
    HubConfig::builder()
        .hub_url(HubUrl::new(server.uri()).unwrap())
        .optimizers_url(HubUrl::new(server.uri()).unwrap())
        .retries_count(2)
        .retry_wait(Duration::from_millis(10))
        .build()
        .unwrap()
}

fn widget_schema() -> ApiSchema {
    ApiSchema::from_json(&json!({
        "widget": {"actions": ["index", "show", "create", "delete"]},
        "part": {"actions": ["index", "show"], "parent_resource": "widget"}
    }))
    .unwrap()
}

fn page(items: &[i64]) -> Value {
    json!({
        "data": items.iter().map(|id| json!({"id": id})).collect::<Vec<_>>(),
        "meta": {"pagination": {"count": items.len()}}
    })
}

// ============================================================================
// Generated Operations
// ============================================================================

#[tokio::test]
async fn test_schema_generates_exactly_the_declared_operations() {
    let server = MockServer::start().await;
    let schema = ApiSchema::from_json(&json!({
        "widget": {"actions": ["index", "show", "create"]}
    }))
    .unwrap();

    let client = HubApiClient::new(config_for(&server), &schema).unwrap();

    let names: Vec<&str> = client.operation_names().collect();
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

#[tokio::test]
async fn test_show_and_create_hit_expected_routes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/widgets/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/widgets"))
        .and(body_json(json!({"name": "sprocket"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 8})))
        .mount(&server)
        .await;

    let client = HubApiClient::new(config_for(&server), &widget_schema()).unwrap();

    let shown = client
        .call("get_widget", OperationArgs::with_id(7))
        .await
        .unwrap();
    assert_eq!(shown["id"], json!(7));

    let created = client
        .call(
            "create_widget",
            OperationArgs::new().param("name", "sprocket"),
        )
        .await
        .unwrap();
    assert_eq!(created["id"], json!(8));
}

#[tokio::test]
async fn test_nested_operation_without_parent_id_sends_nothing() {
    let server = MockServer::start().await;
    let client = HubApiClient::new(config_for(&server), &widget_schema()).unwrap();

    let error = client
        .call("get_part", OperationArgs::with_id(1))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::MissingParam);
    assert_eq!(error.message(), "widget_id parameter is required");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_nested_operation_resolves_parent_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/widgets/3/parts/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4})))
        .mount(&server)
        .await;

    let client = HubApiClient::new(config_for(&server), &widget_schema()).unwrap();
    let part = client
        .call(
            "get_part",
            OperationArgs::with_id(4).parent_id("widget", 3),
        )
        .await
        .unwrap();

    assert_eq!(part["id"], json!(4));
}

#[tokio::test]
async fn test_delete_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/widgets/2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = HubApiClient::new(config_for(&server), &widget_schema()).unwrap();
    let error = client
        .call("delete_widget", OperationArgs::with_id(2))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Retryable);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_clients_with_different_schemas_are_independent() {
    let server = MockServer::start().await;
    let widgets = HubApiClient::new(config_for(&server), &widget_schema()).unwrap();
    let hub = HubApiClient::hub(config_for(&server)).unwrap();

    assert!(widgets.has_operation("get_widget"));
    assert!(!widgets.has_operation("get_project"));
    assert!(hub.has_operation("get_project"));
    assert!(!hub.has_operation("get_widget"));

    let error = widgets
        .call("get_project", OperationArgs::with_id(1))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Fatal);
}

#[tokio::test]
async fn test_concurrent_calls_on_one_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/widgets/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/widgets/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2})))
        .mount(&server)
        .await;

    let client = HubApiClient::new(config_for(&server), &widget_schema()).unwrap();
    let (first, second) = tokio::join!(
        client.call("get_widget", OperationArgs::with_id(1)),
        client.call("get_widget", OperationArgs::with_id(2)),
    );

    assert_eq!(first.unwrap()["id"], json!(1));
    assert_eq!(second.unwrap()["id"], json!(2));
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_iterate_all_walks_every_page() {
    let server = MockServer::start().await;
    for (offset, items) in [(0, vec![1, 2]), (2, vec![3, 4]), (4, vec![])] {
        Mock::given(method("GET"))
            .and(path("/api/v1/widgets"))
            .and(body_json(json!({"limit": 2, "offset": offset})))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&items)))
            .mount(&server)
            .await;
    }

    let client = HubApiClient::new(config_for(&server), &widget_schema()).unwrap();
    let mut ids = Vec::new();
    client
        .iterate_all(
            "iterate_all_widgets",
            OperationArgs::new().param("limit", 2),
            |widget| ids.push(widget["id"].clone()),
        )
        .await
        .unwrap();

    assert_eq!(ids, vec![json!(1), json!(2), json!(3), json!(4)]);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_plural_fetches_single_page_with_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/widgets"))
        .and(body_json(json!({"limit": 50, "offset": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[1])))
        .mount(&server)
        .await;

    let client = HubApiClient::new(config_for(&server), &widget_schema()).unwrap();
    let response = client
        .call("get_widgets", OperationArgs::new())
        .await
        .unwrap();

    assert_eq!(response["meta"]["pagination"]["count"], json!(1));
}

#[tokio::test]
async fn test_iterate_all_stops_on_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/widgets"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = HubApiClient::new(config_for(&server), &widget_schema()).unwrap();
    let mut handled = 0;
    let error = client
        .iterate_all("get_widgets", OperationArgs::new(), |_| handled += 1)
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Fatal);
    assert_eq!(handled, 0);
}

// ============================================================================
// Hub Endpoints
// ============================================================================

#[tokio::test]
async fn test_update_trials_patches_collection() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/trials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": 2})))
        .mount(&server)
        .await;

    let client = HubApiClient::hub(config_for(&server)).unwrap();
    let mut params = Map::new();
    params.insert("trials".to_string(), json!([{"id": 1}, {"id": 2}]));

    let response = client.update_trials(params).await.unwrap();
    assert_eq!(response["updated"], json!(2));
}

#[tokio::test]
async fn test_project_logs_are_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/5/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("started\nfinished"))
        .mount(&server)
        .await;

    let client = HubApiClient::hub(config_for(&server)).unwrap();
    let logs = client.get_project_logs(5).await.unwrap();

    assert_eq!(logs, "started\nfinished");
}

#[tokio::test]
async fn test_project_file_url_lists_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/project_file_urls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[1])))
        .mount(&server)
        .await;

    let client = HubApiClient::hub(config_for(&server)).unwrap();
    let response = client.get_project_file_url(Map::new()).await.unwrap();

    assert_eq!(response["data"][0]["id"], json!(1));
}

#[tokio::test]
async fn test_status_sends_object_and_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .and(body_json(json!({"object": "project", "id": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "running"})))
        .mount(&server)
        .await;

    let client = HubApiClient::hub(config_for(&server)).unwrap();
    let response = client.get_status("project", 3).await.unwrap();

    assert_eq!(response["status"], json!("running"));
}

#[tokio::test]
async fn test_next_trials_is_gzipped_and_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/next_trials"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/next_trials"))
        .and(header("content-encoding", "gzip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"trials": [1]})))
        .mount(&server)
        .await;

    let config = HubConfig::builder()
        .hub_url(HubUrl::new(server.uri()).unwrap())
        .optimizers_url(HubUrl::new(server.uri()).unwrap())
        .project_api_token(ApiToken::new("project").unwrap())
        .retries_count(2)
        .retry_wait(Duration::from_millis(10))
        .build()
        .unwrap();
    let client = HubApiClient::hub(config).unwrap();
    let mut payload = Map::new();
    payload.insert("trials_limit".to_string(), json!(1));

    let response = client.get_next_trials(payload).await.unwrap();
    assert_eq!(response["trials"], json!([1]));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let mut decoded = String::new();
    GzDecoder::new(requests[1].body.as_slice())
        .read_to_string(&mut decoded)
        .unwrap();
    let body: Value = serde_json::from_str(&decoded).unwrap();
    assert_eq!(
        body,
        json!({"trials_limit": 1, "project_api_token": "project"})
    );
}
