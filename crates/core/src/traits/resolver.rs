use async_trait::async_trait;

use crate::errors::DispatchResult;

/// 凭证转换接口
///
/// 用上游身份凭证换取访问令牌。
#[async_trait]
pub trait TokenResolver: Send + Sync {
    /// 将Cookie转换为访问令牌
    ///
    /// 失败时返回 [`DispatchError`](crate::errors::DispatchError) 中
    /// 对应的凭证类错误变体。
    async fn resolve(&self, cookie: &str) -> DispatchResult<String>;
}
