use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use sharecast_api::create_app;
use sharecast_core::{DispatchConfig, DispatchResult, DispatchService, TokenResolver};
use sharecast_dispatcher::DispatchEngine;
use sharecast_worker::MockTaskExecutor;

pub fn test_dispatch_config() -> DispatchConfig {
    DispatchConfig {
        max_workers: 3,
        max_count: 50,
        task_timeout_seconds: 2,
        grace_period_seconds: 1,
        default_share_delay_seconds: 0.0,
    }
}

/// 返回固定令牌的解析器，分享相关测试不关心凭证转换
struct StaticTokenResolver;

#[async_trait::async_trait]
impl TokenResolver for StaticTokenResolver {
    async fn resolve(&self, _cookie: &str) -> DispatchResult<String> {
        Ok("EAAGstatictoken".to_string())
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// 用脚本化执行器和真实分发引擎启动完整API实例
    pub async fn spawn(executor: Arc<MockTaskExecutor>) -> TestApp {
        let config = test_dispatch_config();
        let engine = DispatchEngine::new(executor, config.clone());
        Self::spawn_inner(Arc::new(engine), Arc::new(StaticTokenResolver), config).await
    }

    /// 用指定的令牌解析器启动，分发引擎挂一个不会被调用的执行器
    pub async fn spawn_with_resolver(resolver: Arc<dyn TokenResolver>) -> TestApp {
        let config = test_dispatch_config();
        let engine = DispatchEngine::new(
            Arc::new(MockTaskExecutor::new("unused")),
            config.clone(),
        );
        Self::spawn_inner(Arc::new(engine), resolver, config).await
    }

    async fn spawn_inner(
        dispatch_service: Arc<dyn DispatchService>,
        token_resolver: Arc<dyn TokenResolver>,
        config: DispatchConfig,
    ) -> TestApp {
        let app = create_app(dispatch_service, token_resolver, config);
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to start test server");
        });

        TestApp {
            address,
            client: reqwest::Client::new(),
        }
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// 启动一个扮演上游管理页面的服务器，返回其基地址
pub async fn spawn_upstream(status: StatusCode, body: &'static str) -> String {
    serve_upstream(Router::new().route(
        "/content_management",
        get(move || async move { (status, body) }),
    ))
    .await
}

/// 启动一个响应前先休眠的上游，用于触发超时路径
pub async fn spawn_slow_upstream(delay: Duration) -> String {
    serve_upstream(Router::new().route(
        "/content_management",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "\"EAAGlate\""
        }),
    ))
    .await
}

async fn serve_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream port");
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Failed to start upstream server");
    });

    address
}
