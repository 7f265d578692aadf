use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, warn};

use sharecast_core::{
    config::DispatchConfig,
    errors::{DispatchError, DispatchResult},
    models::{DispatchJob, DispatchMode, JobResult},
    traits::{DispatchService, TaskExecutor},
};

use crate::aggregator::ResultAggregator;
use crate::strategies::{ConcurrentStrategy, DispatchStrategy, SequentialStrategy};

/// 分发引擎
///
/// [`DispatchService`] 的标准实现：校验作业结构、把请求的并发数收紧到
/// 全局上限以内、按模式选择策略执行，最后从聚合器生成汇总结果。
///
/// 校验失败是作业被整体拒绝的唯一途径，执行阶段的任何任务失败都只
/// 体现在结果计数里。
pub struct DispatchEngine {
    executor: Arc<dyn TaskExecutor>,
    config: DispatchConfig,
    concurrent: ConcurrentStrategy,
    sequential: SequentialStrategy,
}

impl DispatchEngine {
    pub fn new(executor: Arc<dyn TaskExecutor>, config: DispatchConfig) -> Self {
        let concurrent = ConcurrentStrategy::new(config.task_timeout(), config.grace_period());
        Self {
            executor,
            config,
            concurrent,
            sequential: SequentialStrategy::new(),
        }
    }

    /// 校验作业结构
    fn validate(&self, job: &DispatchJob) -> DispatchResult<()> {
        if job.link.trim().is_empty()
            || job.credential.trim().is_empty()
            || job.access_token.trim().is_empty()
        {
            return Err(DispatchError::invalid_job("Missing required fields"));
        }

        if job.count < 1 {
            return Err(DispatchError::invalid_job("Count must be at least 1"));
        }

        if job.count > self.config.max_count {
            return Err(DispatchError::invalid_job(format!(
                "Count must not exceed {}",
                self.config.max_count
            )));
        }

        Ok(())
    }

    /// 将请求的并发数收紧到 `[1, max_workers]` 区间
    fn normalize(&self, mut job: DispatchJob) -> DispatchJob {
        let requested = job.max_workers;
        job.max_workers = requested.clamp(1, self.config.max_workers as i64);
        if requested != job.max_workers {
            warn!(
                "并发数超出允许范围，已调整: job_id={}, 请求={}, 实际={}",
                job.id, requested, job.max_workers
            );
        }
        job
    }
}

#[async_trait]
impl DispatchService for DispatchEngine {
    async fn run(&self, job: DispatchJob) -> DispatchResult<JobResult> {
        self.validate(&job)?;
        let job = self.normalize(job);

        let strategy: &dyn DispatchStrategy = match job.mode {
            DispatchMode::Concurrent => &self.concurrent,
            DispatchMode::Sequential => &self.sequential,
        };

        info!(
            "开始分发作业: job_id={}, 策略={}, 份数={}, 并发={}",
            job.id,
            strategy.name(),
            job.count,
            job.max_workers
        );

        let started = Instant::now();
        let aggregator = ResultAggregator::new();
        strategy
            .dispatch(&job, Arc::clone(&self.executor), &aggregator)
            .await?;

        let result = aggregator.snapshot(job.mode, started.elapsed().as_millis() as u64);
        info!(
            "作业分发完成: job_id={}, 成功={}, 失败={}, 已执行={}, 耗时={}ms",
            job.id,
            result.success_count,
            result.failed_count,
            result.executed_count,
            result.duration_ms
        );

        Ok(result)
    }
}
