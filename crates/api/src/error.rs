use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sharecast_core::DispatchError;

/// API 层错误，统一映射为 `{"error": 消息}` 响应体。
///
/// 消息文本直接来自 [`DispatchError`] 的 Display 实现，属于接口契约，
/// 客户端按字面值匹配。
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Dispatch(err) => match err {
                DispatchError::InvalidJob(_)
                | DispatchError::CredentialRejected
                | DispatchError::TokenNotFound => StatusCode::BAD_REQUEST,
                DispatchError::CredentialTimeout => StatusCode::GATEWAY_TIMEOUT,
                DispatchError::UpstreamUnreachable(_) | DispatchError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
