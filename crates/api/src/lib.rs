//! # Sharecast API
//!
//! 批量分享任务分发服务的REST API模块，基于Axum构建。
//!
//! ## API 端点
//!
//! - `GET /api/health` - 健康检查
//! - `POST /api/convert-cookie` - 用Cookie换取上游访问令牌
//! - `POST /api/share` - 提交批量分享作业，同步等待完成后返回汇总结果
//!
//! 错误统一为 `{"error": 消息}` 响应体，消息文本属于接口契约，
//! 客户端按字面值匹配，不要随意改动。
//!
//! ## 使用示例
//!
//! ```bash
//! # 健康检查
//! curl http://localhost:5000/api/health
//!
//! # Cookie转换
//! curl -X POST http://localhost:5000/api/convert-cookie \
//!   -H "Content-Type: application/json" \
//!   -d '{"cookie": "c_user=100001; xs=abc"}'
//!
//! # 批量分享
//! curl -X POST http://localhost:5000/api/share \
//!   -H "Content-Type: application/json" \
//!   -d '{"link": "https://example.com/post/1", "cookie": "c_user=100001",
//!        "token": "EAAG...", "count": 5, "mode": "fast", "maxWorkers": 5}'
//! ```
//!
//! ## 中间件
//!
//! - **CORS**: 允许任意来源的GET/POST请求
//! - **请求日志**: 记录每个请求的方法、路径、状态与耗时
//! - **追踪**: tower-http 的HTTP层追踪

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;

use sharecast_core::{DispatchConfig, DispatchService, TokenResolver};

use middleware::{cors_layer, request_logging, trace_layer};
use routes::{create_routes, AppState};

/// 创建完整的API应用
pub fn create_app(
    dispatch_service: Arc<dyn DispatchService>,
    token_resolver: Arc<dyn TokenResolver>,
    dispatch_config: DispatchConfig,
) -> Router {
    let state = AppState {
        dispatch_service,
        token_resolver,
        dispatch_config,
    };

    create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(cors_layer())
            .layer(axum::middleware::from_fn(request_logging)),
    )
}
