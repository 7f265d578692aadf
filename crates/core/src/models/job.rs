use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 分发模式
///
/// 决定作业内各份分享任务的执行方式。
///
/// # 变体说明
///
/// - `Concurrent`: 并发执行，由固定容量的工作池限制同时在途的任务数
/// - `Sequential`: 顺序执行，任务间插入固定延迟，失败过半时中止
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DispatchMode {
    #[serde(rename = "fast")]
    Concurrent,
    #[serde(rename = "slow")]
    Sequential,
}

impl DispatchMode {
    /// 解析请求中的mode参数
    ///
    /// 只有 `"slow"` 映射为顺序模式，其余值（包括未知值）一律回退为并发模式。
    pub fn from_request(value: &str) -> Self {
        match value {
            "slow" => DispatchMode::Sequential,
            _ => DispatchMode::Concurrent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Concurrent => "fast",
            DispatchMode::Sequential => "slow",
        }
    }
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 分发作业
///
/// 表示一次批量分享请求，构造完成后在整个执行过程中保持不可变。
///
/// # 字段说明
///
/// - `id`: 作业的唯一标识，用于日志关联
/// - `link`: 要分享的目标链接
/// - `credential`: 上游身份凭证（Cookie）
/// - `access_token`: 上游访问令牌
/// - `count`: 分享份数
/// - `mode`: 执行模式
/// - `max_workers`: 请求的并发上限，引擎会再按全局上限收紧
/// - `inter_task_delay`: 顺序模式下相邻任务之间的延迟
#[derive(Debug, Clone)]
pub struct DispatchJob {
    pub id: Uuid,
    pub link: String,
    pub credential: String,
    pub access_token: String,
    pub count: i64,
    pub mode: DispatchMode,
    pub max_workers: i64,
    pub inter_task_delay: Duration,
}

impl DispatchJob {
    /// 创建新作业
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        link: String,
        credential: String,
        access_token: String,
        count: i64,
        mode: DispatchMode,
        max_workers: i64,
        inter_task_delay: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            link,
            credential,
            access_token,
            count,
            mode,
            max_workers,
            inter_task_delay,
        }
    }

    /// 检查作业是否为顺序模式
    pub fn is_sequential(&self) -> bool {
        matches!(self.mode, DispatchMode::Sequential)
    }
}
