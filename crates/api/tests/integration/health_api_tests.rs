use std::sync::Arc;

use serde_json::{json, Value};
use sharecast_worker::MockTaskExecutor;

use super::test_utils::TestApp;

#[tokio::test]
async fn test_health_returns_ok() {
    let app = TestApp::spawn(Arc::new(MockTaskExecutor::new("health"))).await;

    let response = app
        .client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::spawn(Arc::new(MockTaskExecutor::new("health"))).await;

    let response = app
        .client
        .get(format!("{}/api/missing", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 404);
}
