use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use sharecast_core::config::DispatchConfig;
use sharecast_core::traits::{DispatchService, TokenResolver};

use crate::handlers::{health::health_check, share::share_post, token::convert_cookie};

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub dispatch_service: Arc<dyn DispatchService>,
    pub token_resolver: Arc<dyn TokenResolver>,
    pub dispatch_config: DispatchConfig,
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/api/health", get(health_check))
        // 凭证转换API
        .route("/api/convert-cookie", post(convert_cookie))
        // 批量分享API
        .route("/api/share", post(share_post))
        .with_state(state)
}
