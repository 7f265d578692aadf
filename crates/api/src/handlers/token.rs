use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::routes::AppState;

/// Cookie 转换请求
#[derive(Debug, Deserialize)]
pub struct ConvertCookieRequest {
    pub cookie: Option<String>,
}

/// Cookie 转换响应
#[derive(Debug, Serialize)]
pub struct ConvertCookieResponse {
    pub token: String,
}

/// 用 Cookie 换取上游访问令牌
pub async fn convert_cookie(
    State(state): State<AppState>,
    payload: Result<Json<ConvertCookieRequest>, JsonRejection>,
) -> ApiResult<Json<ConvertCookieResponse>> {
    let Json(request) =
        payload.map_err(|_| ApiError::BadRequest("Invalid JSON body".to_string()))?;

    let cookie = request.cookie.unwrap_or_default();
    let cookie = cookie.trim();
    if cookie.is_empty() {
        return Err(ApiError::BadRequest("Missing cookie".to_string()));
    }

    // Cookie 是凭证，日志里只留前缀用于排查
    let preview: String = cookie.chars().take(30).collect();
    info!("收到Cookie转换请求: {}...", preview);

    let token = state.token_resolver.resolve(cookie).await?;

    Ok(Json(ConvertCookieResponse { token }))
}
