use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

use sharecast_api::create_app;
use sharecast_core::AppConfig;
use sharecast_dispatcher::DispatchEngine;
use sharecast_worker::{CookieTokenResolver, ShareExecutor};

/// 主应用程序
///
/// 把配置装配成可运行的HTTP服务：共享的HTTP客户端、分享执行器、
/// 分发引擎与凭证转换器，最后挂到Axum路由上。
pub struct Application {
    config: AppConfig,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 运行HTTP服务直到收到关闭信号
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        // 分享请求与凭证转换共用一个连接池
        let client = reqwest::Client::new();

        let executor = Arc::new(ShareExecutor::new(
            client.clone(),
            self.config.upstream.clone(),
            self.config.dispatch.task_timeout(),
        ));
        let engine = Arc::new(DispatchEngine::new(executor, self.config.dispatch.clone()));
        let resolver = Arc::new(CookieTokenResolver::new(
            client,
            self.config.upstream.clone(),
            self.config.dispatch.task_timeout(),
        ));

        let app = create_app(engine, resolver, self.config.dispatch.clone());

        let listener = TcpListener::bind(&self.config.server.bind_address)
            .await
            .with_context(|| format!("绑定地址失败: {}", self.config.server.bind_address))?;

        info!("API服务器启动在 http://{}", self.config.server.bind_address);

        // 分享作业可能运行数十秒，关闭时等在途请求做完再退出
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("API服务器收到关闭信号");
            })
            .await
            .context("API服务器运行失败")?;

        info!("API服务器已停止");
        Ok(())
    }
}
