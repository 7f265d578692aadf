use std::sync::Mutex;

use sharecast_core::models::{DispatchMode, JobResult, TaskOutcome};

/// 结果聚合器
///
/// 收集一次作业内所有任务的结果。计数更新与结果追加在同一把锁内完成，
/// 任意时刻的快照都满足 `success_count + failed_count == outcomes.len()`。
pub struct ResultAggregator {
    state: Mutex<AggregateState>,
}

#[derive(Default)]
struct AggregateState {
    success_count: usize,
    failed_count: usize,
    outcomes: Vec<TaskOutcome>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AggregateState::default()),
        }
    }

    /// 记录一个任务结果
    pub fn record(&self, outcome: TaskOutcome) {
        let mut state = self.lock();
        if outcome.succeeded {
            state.success_count += 1;
        } else {
            state.failed_count += 1;
        }
        state.outcomes.push(outcome);
    }

    /// 当前失败计数，顺序策略的熔断判定使用
    pub fn failed_count(&self) -> usize {
        self.lock().failed_count
    }

    /// 已执行的任务数
    pub fn executed_count(&self) -> usize {
        self.lock().outcomes.len()
    }

    /// 生成汇总快照
    pub fn snapshot(&self, mode: DispatchMode, duration_ms: u64) -> JobResult {
        let state = self.lock();
        JobResult {
            mode,
            success_count: state.success_count,
            failed_count: state.failed_count,
            executed_count: state.outcomes.len(),
            outcomes: state.outcomes.clone(),
            duration_ms,
        }
    }

    // record只做内存操作不会panic，锁不会中毒
    fn lock(&self) -> std::sync::MutexGuard<'_, AggregateState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}
