use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use sharecast_core::{
    errors::{DispatchError, DispatchResult},
    models::{DispatchJob, TaskErrorKind, TaskOutcome},
    traits::TaskExecutor,
};

use crate::aggregator::ResultAggregator;

/// 分发策略接口
///
/// 策略负责驱动作业内全部任务的执行并把结果计入聚合器。
/// 调用方需保证作业已通过校验且 `max_workers` 至少为1。
#[async_trait]
pub trait DispatchStrategy: Send + Sync {
    /// 执行作业内的任务
    async fn dispatch(
        &self,
        job: &DispatchJob,
        executor: Arc<dyn TaskExecutor>,
        aggregator: &ResultAggregator,
    ) -> DispatchResult<()>;

    /// 策略名称
    fn name(&self) -> &str;
}

/// 并发策略
///
/// 固定容量的工作池：提交循环先从信号量取得许可再生成任务，
/// 同时在途的任务数不会超过 `max_workers`。所有份数都会被提交执行，
/// 单个任务失败不会影响其余任务。
///
/// 等待结果时对每个任务施加任务超时加宽限期的上界。超出上界的任务
/// 记为超时失败，其句柄被丢弃后任务自行脱离，不会被取消。
pub struct ConcurrentStrategy {
    task_timeout: Duration,
    grace_period: Duration,
}

impl ConcurrentStrategy {
    pub fn new(task_timeout: Duration, grace_period: Duration) -> Self {
        Self {
            task_timeout,
            grace_period,
        }
    }
}

#[async_trait]
impl DispatchStrategy for ConcurrentStrategy {
    async fn dispatch(
        &self,
        job: &DispatchJob,
        executor: Arc<dyn TaskExecutor>,
        aggregator: &ResultAggregator,
    ) -> DispatchResult<()> {
        let count = job.count as usize;
        let permits = job.max_workers.max(1) as usize;

        let semaphore = Arc::new(Semaphore::new(permits));
        let shared_job = Arc::new(job.clone());
        let mut handles: Vec<JoinHandle<TaskOutcome>> = Vec::with_capacity(count);

        for index in 0..count {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| DispatchError::internal(format!("工作池信号量已关闭: {e}")))?;
            let executor = Arc::clone(&executor);
            let job = Arc::clone(&shared_job);

            debug!("提交任务: job_id={}, index={}", job.id, index);
            handles.push(tokio::spawn(async move {
                let _permit = permit;
                executor.execute(&job, index).await
            }));
        }

        // 提交循环本身受信号量限流，每个句柄在开始等待时任务都已在执行，
        // 等待上界只会在执行器自身卡死时触发
        let wait_budget = self.task_timeout + self.grace_period;
        for (index, handle) in handles.into_iter().enumerate() {
            let wait_started = Instant::now();
            match tokio::time::timeout(wait_budget, handle).await {
                Ok(Ok(outcome)) => aggregator.record(outcome),
                Ok(Err(e)) => {
                    error!(
                        "任务执行单元异常退出: job_id={}, index={}, 原因={}",
                        job.id, index, e
                    );
                    aggregator.record(TaskOutcome::failure(
                        index,
                        TaskErrorKind::Transport,
                        format!("worker task failed: {e}"),
                        wait_started.elapsed().as_millis() as u64,
                    ));
                }
                Err(_) => {
                    warn!(
                        "等待任务完成超过宽限期: job_id={}, index={}, 上界={}ms",
                        job.id,
                        index,
                        wait_budget.as_millis()
                    );
                    aggregator.record(TaskOutcome::failure(
                        index,
                        TaskErrorKind::Timeout,
                        "timed out waiting for task completion",
                        wait_budget.as_millis() as u64,
                    ));
                }
            }
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "Concurrent"
    }
}

/// 顺序策略
///
/// 严格按下标顺序逐个执行，相邻任务之间插入固定延迟，最后一个任务
/// 之后不再延迟。失败数超过总份数一半时中止剩余任务，已产生的结果
/// 保持不变。
pub struct SequentialStrategy;

impl SequentialStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SequentialStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DispatchStrategy for SequentialStrategy {
    async fn dispatch(
        &self,
        job: &DispatchJob,
        executor: Arc<dyn TaskExecutor>,
        aggregator: &ResultAggregator,
    ) -> DispatchResult<()> {
        let count = job.count as usize;

        for index in 0..count {
            let outcome = executor.execute(job, index).await;
            aggregator.record(outcome);

            // 熔断阈值为份数的一半（向下取整），严格大于才触发
            if aggregator.failed_count() > count / 2 {
                info!(
                    "失败次数过多，中止剩余任务: job_id={}, 已失败={}, 总份数={}",
                    job.id,
                    aggregator.failed_count(),
                    count
                );
                break;
            }

            if index + 1 < count {
                tokio::time::sleep(job.inter_task_delay).await;
            }
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "Sequential"
    }
}
