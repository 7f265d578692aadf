use async_trait::async_trait;

use crate::models::{DispatchJob, TaskOutcome};

/// 任务执行器接口
///
/// 负责执行作业中的单次分享尝试，并把所有可能的失败统一归类为
/// [`TaskErrorKind`](crate::models::TaskErrorKind)。
///
/// # 契约
///
/// `execute` 永远不返回错误：网络故障、超时、上游拒绝等一律转化为
/// 失败的 [`TaskOutcome`]。调用方因此可以把每个下标的结果直接计入
/// 聚合器，不需要额外的错误分支。
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// 执行作业中的第 `index` 份分享
    ///
    /// # 参数
    ///
    /// - `job`: 所属作业，提供链接、凭证与令牌
    /// - `index`: 本次尝试在作业中的下标，从0开始
    ///
    /// # 返回值
    ///
    /// 该下标的最终结果，成功或失败都通过 [`TaskOutcome`] 表达
    async fn execute(&self, job: &DispatchJob, index: usize) -> TaskOutcome;

    /// 执行器名称，用于日志
    fn name(&self) -> &str;
}
