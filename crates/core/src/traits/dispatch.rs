use async_trait::async_trait;

use crate::errors::DispatchResult;
use crate::models::{DispatchJob, JobResult};

/// 分发服务接口
///
/// API层通过该接口提交作业，不感知背后的策略选择与执行细节。
#[async_trait]
pub trait DispatchService: Send + Sync {
    /// 执行一个分发作业并返回汇总结果
    ///
    /// 只有作业本身结构非法时才返回错误；单个任务的失败计入
    /// [`JobResult`](crate::models::JobResult) 而不会令整个作业失败。
    async fn run(&self, job: DispatchJob) -> DispatchResult<JobResult>;
}
