use serde::{Deserialize, Serialize};

use crate::models::DispatchMode;

/// 任务失败分类
///
/// 单次分享尝试失败时的归类，分类逻辑在执行器中集中判定。
///
/// # 变体说明
///
/// - `Timeout`: 请求超时，或等待任务完成超出宽限期
/// - `Transport`: 连接层错误（DNS、拒绝连接等）
/// - `HttpStatus`: 上游返回的HTTP状态码不小于400
/// - `UpstreamError`: 上游返回200但响应体中携带明确的错误字段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskErrorKind {
    Timeout,
    Transport,
    HttpStatus(u16),
    UpstreamError,
}

/// 单次任务结果
///
/// 作业中第 `index` 份分享的最终结果，每个下标只产生一次，产生后不再修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub index: usize,
    pub succeeded: bool,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<TaskErrorKind>,
    pub duration_ms: u64,
}

impl TaskOutcome {
    /// 创建成功结果
    pub fn success(index: usize, detail: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            index,
            succeeded: true,
            detail: detail.into(),
            error_kind: None,
            duration_ms,
        }
    }

    /// 创建失败结果
    pub fn failure(
        index: usize,
        kind: TaskErrorKind,
        detail: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            index,
            succeeded: false,
            detail: detail.into(),
            error_kind: Some(kind),
            duration_ms,
        }
    }
}

/// 作业汇总结果
///
/// 作业执行完毕后由聚合器生成的快照。
///
/// # 不变式
///
/// - `success_count + failed_count == executed_count`
/// - `outcomes.len() == executed_count`
/// - 并发模式下 `executed_count` 等于作业份数；顺序模式因中止可能更小
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub mode: DispatchMode,
    pub success_count: usize,
    pub failed_count: usize,
    pub executed_count: usize,
    pub outcomes: Vec<TaskOutcome>,
    pub duration_ms: u64,
}

impl JobResult {
    /// 检查是否全部成功
    pub fn all_succeeded(&self) -> bool {
        self.failed_count == 0
    }
}
