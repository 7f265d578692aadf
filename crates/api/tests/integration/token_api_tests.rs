use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};

use sharecast_core::{TokenResolver, UpstreamConfig};
use sharecast_worker::CookieTokenResolver;

use super::test_utils::{spawn_slow_upstream, spawn_upstream, TestApp};

fn resolver_for(base: &str, timeout: Duration) -> Arc<dyn TokenResolver> {
    let upstream = UpstreamConfig {
        token_url: format!("{}/content_management", base),
        ..UpstreamConfig::default()
    };
    Arc::new(CookieTokenResolver::new(
        reqwest::Client::new(),
        upstream,
        timeout,
    ))
}

#[tokio::test]
async fn test_convert_cookie_extracts_quoted_token() {
    let upstream = spawn_upstream(
        StatusCode::OK,
        r#"<html><script>window.__accessToken = "EAAGquoted123";</script></html>"#,
    )
    .await;
    let app = TestApp::spawn_with_resolver(resolver_for(&upstream, Duration::from_secs(2))).await;

    let response = app
        .post_json("/api/convert-cookie", &json!({ "cookie": "c_user=100001" }))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "token": "EAAGquoted123" }));
}

#[tokio::test]
async fn test_convert_cookie_falls_back_to_bare_token() {
    let upstream = spawn_upstream(
        StatusCode::OK,
        "access_token=EAAGbare456&expires_in=0",
    )
    .await;
    let app = TestApp::spawn_with_resolver(resolver_for(&upstream, Duration::from_secs(2))).await;

    let response = app
        .post_json("/api/convert-cookie", &json!({ "cookie": "c_user=100001" }))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "token": "EAAGbare456" }));
}

#[tokio::test]
async fn test_convert_cookie_page_without_token() {
    let upstream = spawn_upstream(StatusCode::OK, "<html>nothing useful here</html>").await;
    let app = TestApp::spawn_with_resolver(resolver_for(&upstream, Duration::from_secs(2))).await;

    let response = app
        .post_json("/api/convert-cookie", &json!({ "cookie": "c_user=100001" }))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Could not extract token" }));
}

#[tokio::test]
async fn test_convert_cookie_upstream_rejects_credential() {
    let upstream = spawn_upstream(StatusCode::FORBIDDEN, "login required").await;
    let app = TestApp::spawn_with_resolver(resolver_for(&upstream, Duration::from_secs(2))).await;

    let response = app
        .post_json("/api/convert-cookie", &json!({ "cookie": "c_user=expired" }))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Cookie invalid or expired" }));
}

#[tokio::test]
async fn test_convert_cookie_upstream_timeout_is_gateway_timeout() {
    let upstream = spawn_slow_upstream(Duration::from_secs(5)).await;
    let app =
        TestApp::spawn_with_resolver(resolver_for(&upstream, Duration::from_millis(200))).await;

    let response = app
        .post_json("/api/convert-cookie", &json!({ "cookie": "c_user=100001" }))
        .await;

    assert_eq!(response.status(), 504);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!({ "error": "Request timeout - server took too long" })
    );
}

#[tokio::test]
async fn test_convert_cookie_unreachable_upstream_is_server_error() {
    // 占一个端口拿到地址后立刻释放，向它发请求必然拒绝连接
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe port");
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = TestApp::spawn_with_resolver(resolver_for(
        &format!("http://{}", addr),
        Duration::from_secs(2),
    ))
    .await;

    let response = app
        .post_json("/api/convert-cookie", &json!({ "cookie": "c_user=100001" }))
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Connection failed" }));
}

#[tokio::test]
async fn test_convert_cookie_missing_cookie_rejected() {
    let upstream = spawn_upstream(StatusCode::OK, "\"EAAGnever\"").await;
    let app = TestApp::spawn_with_resolver(resolver_for(&upstream, Duration::from_secs(2))).await;

    let response = app.post_json("/api/convert-cookie", &json!({})).await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Missing cookie" }));
}
