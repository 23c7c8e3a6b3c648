//! End-to-end exercise of the fixed route table against the in-memory
//! backends.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post(router: &axum::Router, path: &str, body: Value) -> axum::response::Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(router: &axum::Router, path: &str) -> axum::response::Response {
    router.clone().oneshot(Request::builder().uri(path).body(Body::empty()).unwrap()).await.unwrap()
}

#[tokio::test]
async fn an_unresolvable_query_ends_with_no_interrupt() {
    let (router, _state) = fin_server::routes::create_test_router();

    let started = post(&router, "/stream", json!({"thread_id": "t-unresolvable", "message": "how's the weather"})).await;
    assert_eq!(started.status(), StatusCode::OK);

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let thread = get(&router, "/thread/t-unresolvable").await;
    assert_eq!(thread.status(), StatusCode::OK);
    let state: Value = body_json(thread).await;
    assert_eq!(state["is_running"], json!(false));
    assert!(state["interrupt"].is_null());
}

#[tokio::test]
async fn an_ambiguous_query_pauses_on_an_interrupt_then_resumes_to_completion() {
    let (router, _state) = fin_server::routes::create_test_router();

    post(&router, "/stream", json!({"thread_id": "t-ambiguous", "message": "analyze GOOG"})).await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let thread = get(&router, "/thread/t-ambiguous").await;
    let state: Value = body_json(thread).await;
    assert_eq!(state["is_running"], json!(false));
    assert!(!state["interrupt"].is_null(), "expected a pending ticker_selection interrupt");
    let enum_values = &state["interrupt"]["schema"]["properties"]["selected_symbol"]["enum"];
    assert_eq!(enum_values, &json!(["GOOG", "GOOGL"]));

    let resumed = post(&router, "/stream", json!({"thread_id": "t-ambiguous", "resume_payload": {"selected_symbol": "GOOG"}})).await;
    assert_eq!(resumed.status(), StatusCode::OK);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let thread = get(&router, "/thread/t-ambiguous").await;
    let state: Value = body_json(thread).await;
    assert_eq!(state["is_running"], json!(false));
    assert!(state["interrupt"].is_null());
    assert_eq!(state["agent_outputs"].as_array().unwrap().len(), 5);

    let agents = get(&router, "/thread/t-ambiguous/agents").await;
    let statuses: Value = body_json(agents).await;
    assert_eq!(statuses["debate"], json!("done"));
}

#[tokio::test]
async fn an_unknown_thread_is_a_404() {
    let (router, _state) = fin_server::routes::create_test_router();
    let response = get(&router, "/thread/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn an_unknown_artifact_is_a_404() {
    let (router, _state) = fin_server::routes::create_test_router();
    let response = get(&router, "/api/artifacts/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
