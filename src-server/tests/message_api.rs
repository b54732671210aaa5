use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pipeline_trace_server::{build_state, config::ServerConfig, store::InMemoryMessageStore, web::build_router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router() -> Router {
    let config = ServerConfig::in_memory();
    let store = Arc::new(InMemoryMessageStore::new());
    build_router(build_state(store, &config), &config)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

fn ids(body: &Value) -> Vec<String> {
    body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn planner_and_coder_exchange() {
    let router = router();
    let (status, first) = post(
        &router,
        "/api/pipeline-runs/r1/messages",
        json!({
            "fromAgent": "planner",
            "fromRole": "planner",
            "toAgent": "coder",
            "messageType": "request",
            "content": "implement the parser",
            "phase": "plan",
            "createdAt": "2024-05-01T10:00:00Z"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let first_id = first["id"].as_str().unwrap().to_string();

    let (status, second) = post(
        &router,
        "/api/pipeline-runs/r1/messages",
        json!({
            "fromAgent": "coder",
            "fromRole": "coder",
            "toAgent": "planner",
            "messageType": "response",
            "content": { "files": ["parser.rs"] },
            "phase": "implement",
            "parentId": first_id,
            "createdAt": "2024-05-01T10:05:00Z"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let second_id = second["id"].as_str().unwrap().to_string();

    let (status, all) = get(&router, "/api/messages?pipelineRunId=r1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&all), vec![first_id.clone(), second_id.clone()]);
    assert_eq!(all["total"], 2);
    assert_eq!(all["messages"][1]["content"], json!({ "files": ["parser.rs"] }));
    assert_eq!(all["messages"][1]["parentId"], json!(first_id));

    let (_, coder) = get(&router, "/api/messages?pipelineRunId=r1&agent=coder").await;
    assert_eq!(ids(&coder), vec![first_id.clone(), second_id.clone()]);

    let (_, reviewer) = get(&router, "/api/messages?pipelineRunId=r1&agent=reviewer").await;
    assert_eq!(reviewer["total"], 0);

    let (_, nested) = get(&router, "/api/pipeline-runs/r1/messages?agent=planner").await;
    assert_eq!(nested["total"], 2);

    let (_, runs) = get(&router, "/api/pipeline-runs").await;
    assert_eq!(runs[0]["pipelineRunId"], "r1");
    assert_eq!(runs[0]["messageCount"], 2);
}

#[tokio::test]
async fn missing_run_id_is_a_client_error() {
    let router = router();
    for uri in ["/api/messages", "/api/messages?pipelineRunId=", "/api/messages?agent=coder"] {
        let (status, body) = get(&router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "pipelineRunId is required");
    }
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let router = router();
    let (status, body) = get(&router, "/api/messages?pipelineRunId=a&pipelineRunId=b").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("pipelineRunId"), "{body}");

    let (status, body) = post(&router, "/api/pipeline-runs/r1/messages", json!({ "fromAgent": "planner" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{body}");
}

#[tokio::test]
async fn reply_to_unknown_parent_is_rejected() {
    let router = router();
    let (status, body) = post(
        &router,
        "/api/pipeline-runs/r1/messages",
        json!({
            "fromAgent": "coder",
            "fromRole": "coder",
            "messageType": "response",
            "content": "done",
            "phase": "implement",
            "parentId": "does-not-exist"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("does-not-exist"));

    let (_, listed) = get(&router, "/api/messages?pipelineRunId=r1").await;
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn providers_list_has_expected_shape() {
    let router = router();
    let (status, routine) = get(&router, "/api/providers").await;
    assert_eq!(status, StatusCode::OK);
    let providers = routine.as_array().unwrap();
    assert_eq!(providers.len(), 4);
    for provider in providers {
        assert!(provider["id"].is_string());
        assert!(provider["name"].is_string());
        let available = provider["available"].as_bool().unwrap();
        assert_eq!(provider.get("reason").is_some(), !available);
    }

    let (status, refreshed) = get(&router, "/api/providers?refresh=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn health_check() {
    let router = router();
    let (status, body) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}
