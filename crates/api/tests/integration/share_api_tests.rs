use std::sync::Arc;

use serde_json::{json, Value};
use sharecast_worker::MockTaskExecutor;

use super::test_utils::TestApp;

#[tokio::test]
async fn test_share_fast_mode_all_succeed() {
    let executor = Arc::new(MockTaskExecutor::new("share"));
    let app = TestApp::spawn(executor.clone()).await;

    let response = app
        .post_json(
            "/api/share",
            &json!({
                "link": "https://example.com/post/1",
                "cookie": "c_user=100001; xs=abc",
                "token": "EAAGtoken",
                "count": 5,
                "mode": "fast"
            }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success_count"], 5);
    assert_eq!(body["failed_count"], 0);
    assert_eq!(body["mode"], "fast");
    assert_eq!(body["message"], "Completed: 5 successful, 0 failed");

    let results = body["results"].as_array().expect("results missing");
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|r| r["succeeded"] == true));

    let mut indices: Vec<u64> = results
        .iter()
        .map(|r| r["index"].as_u64().unwrap())
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_share_defaults_to_single_fast_share() {
    let executor = Arc::new(MockTaskExecutor::new("share"));
    let app = TestApp::spawn(executor.clone()).await;

    let response = app
        .post_json(
            "/api/share",
            &json!({
                "link": "https://example.com/post/1",
                "cookie": "c_user=100001",
                "token": "EAAGtoken"
            }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success_count"], 1);
    assert_eq!(body["mode"], "fast");
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_share_unknown_mode_falls_back_to_fast() {
    let executor = Arc::new(MockTaskExecutor::new("share"));
    let app = TestApp::spawn(executor).await;

    let response = app
        .post_json(
            "/api/share",
            &json!({
                "link": "https://example.com/post/1",
                "cookie": "c_user=100001",
                "token": "EAAGtoken",
                "count": 2,
                "mode": "turbo"
            }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["mode"], "fast");
}

#[tokio::test]
async fn test_share_missing_fields_rejected() {
    let executor = Arc::new(MockTaskExecutor::new("share"));
    let app = TestApp::spawn(executor.clone()).await;

    let response = app
        .post_json(
            "/api/share",
            &json!({
                "link": "https://example.com/post/1",
                "cookie": "c_user=100001"
            }),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Missing required fields" }));
    assert!(executor.executed_indices().is_empty());
}

#[tokio::test]
async fn test_share_count_below_one_rejected() {
    let executor = Arc::new(MockTaskExecutor::new("share"));
    let app = TestApp::spawn(executor).await;

    let response = app
        .post_json(
            "/api/share",
            &json!({
                "link": "https://example.com/post/1",
                "cookie": "c_user=100001",
                "token": "EAAGtoken",
                "count": 0
            }),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Count must be at least 1" }));
}

#[tokio::test]
async fn test_share_count_over_ceiling_rejected() {
    let executor = Arc::new(MockTaskExecutor::new("share"));
    let app = TestApp::spawn(executor.clone()).await;

    let response = app
        .post_json(
            "/api/share",
            &json!({
                "link": "https://example.com/post/1",
                "cookie": "c_user=100001",
                "token": "EAAGtoken",
                "count": 51
            }),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Count must not exceed 50" }));
    assert!(executor.executed_indices().is_empty());
}

#[tokio::test]
async fn test_share_malformed_body_rejected() {
    let executor = Arc::new(MockTaskExecutor::new("share"));
    let app = TestApp::spawn(executor).await;

    let response = app
        .client
        .post(format!("{}/api/share", app.address))
        .header("content-type", "application/json")
        .body("definitely not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Invalid JSON body" }));
}

#[tokio::test]
async fn test_share_slow_mode_aborts_after_failure_majority() {
    let executor = Arc::new(MockTaskExecutor::new("share").failing_at(0..6));
    let app = TestApp::spawn(executor.clone()).await;

    let response = app
        .post_json(
            "/api/share",
            &json!({
                "link": "https://example.com/post/1",
                "cookie": "c_user=100001",
                "token": "EAAGtoken",
                "count": 10,
                "mode": "slow",
                "shareDelay": 0.0
            }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success_count"], 0);
    assert_eq!(body["failed_count"], 6);
    assert_eq!(body["mode"], "slow");
    assert_eq!(body["results"].as_array().unwrap().len(), 6);

    // 熔断后剩余4份不再执行
    assert_eq!(executor.executed_indices(), vec![0, 1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_share_worker_ceiling_applies_to_large_requests() {
    let executor = Arc::new(
        MockTaskExecutor::new("share").with_delay(std::time::Duration::from_millis(30)),
    );
    let app = TestApp::spawn(executor.clone()).await;

    let response = app
        .post_json(
            "/api/share",
            &json!({
                "link": "https://example.com/post/1",
                "cookie": "c_user=100001",
                "token": "EAAGtoken",
                "count": 12,
                "maxWorkers": 50
            }),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success_count"], 12);

    // 配置上限是3，即便请求50也不会放大并发
    assert!(executor.peak_in_flight() <= 3);
}
