use thiserror::Error;

/// 分发服务错误类型定义
///
/// 错误消息即对外HTTP响应中的 `error` 字段内容，属于接口契约的一部分，
/// 修改措辞前需要确认客户端不依赖原文。
#[derive(Debug, Error)]
pub enum DispatchError {
    /// 作业结构非法（缺字段、份数越界等），对应400
    #[error("{0}")]
    InvalidJob(String),

    /// 上游拒绝了凭证，对应400
    #[error("Cookie invalid or expired")]
    CredentialRejected,

    /// 凭证有效但页面中提取不到令牌，对应400
    #[error("Could not extract token")]
    TokenNotFound,

    /// 凭证转换请求超时，对应504
    #[error("Request timeout - server took too long")]
    CredentialTimeout,

    /// 无法连接上游，对应500；内部携带原始错误描述供日志使用
    #[error("Connection failed")]
    UpstreamUnreachable(String),

    /// 其他内部错误，对应500
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// 创建作业校验错误
    pub fn invalid_job(message: impl Into<String>) -> Self {
        DispatchError::InvalidJob(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        DispatchError::Internal(message.into())
    }
}

/// 统一的Result类型
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;
