use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, error, warn};

use sharecast_core::{
    config::UpstreamConfig,
    models::{DispatchJob, TaskErrorKind, TaskOutcome},
    traits::TaskExecutor,
};

/// 成功结果中保留的响应体最大字符数
const DETAIL_MAX_CHARS: usize = 200;

/// 分享任务执行器
///
/// 对上游接口发起一次分享请求，并把结果归类为 [`TaskOutcome`]。
/// 所有失败路径都转化为带分类的失败结果，从不向调用方返回错误。
pub struct ShareExecutor {
    /// HTTP客户端，同一作业内的全部任务复用连接池
    client: reqwest::Client,
    upstream: UpstreamConfig,
    /// 单次请求的超时时间
    task_timeout: Duration,
}

impl ShareExecutor {
    /// 创建新的分享执行器
    pub fn new(client: reqwest::Client, upstream: UpstreamConfig, task_timeout: Duration) -> Self {
        Self {
            client,
            upstream,
            task_timeout,
        }
    }
}

#[async_trait]
impl TaskExecutor for ShareExecutor {
    async fn execute(&self, job: &DispatchJob, index: usize) -> TaskOutcome {
        let started = Instant::now();
        debug!("执行分享任务: job_id={}, index={}", job.id, index);

        let response = self
            .client
            .post(&self.upstream.share_url)
            .query(&[
                ("link", job.link.as_str()),
                ("published", "0"),
                ("access_token", job.access_token.as_str()),
            ])
            .header("accept", "*/*")
            .header("cookie", job.credential.as_str())
            .header("user-agent", self.upstream.user_agent.as_str())
            .timeout(self.task_timeout)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!("分享请求超时: job_id={}, index={}", job.id, index);
                return TaskOutcome::failure(
                    index,
                    TaskErrorKind::Timeout,
                    "request timed out",
                    started.elapsed().as_millis() as u64,
                );
            }
            Err(e) => {
                error!(
                    "分享请求连接失败: job_id={}, index={}, 错误={}",
                    job.id, index, e
                );
                return TaskOutcome::failure(
                    index,
                    TaskErrorKind::Transport,
                    format!("connection error: {e}"),
                    started.elapsed().as_millis() as u64,
                );
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!(
                    "读取响应体失败: job_id={}, index={}, 错误={}",
                    job.id, index, e
                );
                return TaskOutcome::failure(
                    index,
                    TaskErrorKind::Transport,
                    format!("failed to read response body: {e}"),
                    started.elapsed().as_millis() as u64,
                );
            }
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        match classify_failure(status, &body) {
            Some((kind, detail)) => {
                debug!(
                    "分享任务失败: job_id={}, index={}, 分类={:?}",
                    job.id, index, kind
                );
                TaskOutcome::failure(index, kind, detail, duration_ms)
            }
            None => TaskOutcome::success(index, success_detail(&body), duration_ms),
        }
    }

    fn name(&self) -> &str {
        "ShareExecutor"
    }
}

/// 响应分类判定
///
/// 判定顺序：状态码不小于400直接按状态码归类；其次检查响应体是否为
/// 携带 `error` 字段的JSON对象；两者都不命中即视为成功。
pub(crate) fn classify_failure(
    status: reqwest::StatusCode,
    body: &str,
) -> Option<(TaskErrorKind, String)> {
    if status.as_u16() >= 400 {
        return Some((
            TaskErrorKind::HttpStatus(status.as_u16()),
            format!("upstream returned HTTP {}", status.as_u16()),
        ));
    }

    if let Some(message) = upstream_error_message(body) {
        return Some((TaskErrorKind::UpstreamError, message));
    }

    None
}

/// 从响应体中提取明确的错误描述
///
/// 只有响应体是JSON对象且顶层存在 `error` 键时才算上游错误，
/// 正文中偶然出现的"error"字样不会触发误判。
fn upstream_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.as_object()?.get("error")?;

    let message = match error {
        serde_json::Value::String(text) => text.clone(),
        other => other
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    };

    Some(message)
}

/// 成功结果携带的响应摘要
fn success_detail(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "shared".to_string();
    }
    truncate_chars(trimmed, DETAIL_MAX_CHARS)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}

/// 测试用执行器
///
/// 按脚本产生结果：可配置固定延迟、指定失败或panic的下标，并记录
/// 调用顺序与并发峰值，供策略层测试断言。
pub struct MockTaskExecutor {
    name: String,
    delay: Duration,
    fail_indices: HashSet<usize>,
    panic_indices: HashSet<usize>,
    calls: Mutex<Vec<usize>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockTaskExecutor {
    /// 创建默认全部成功、无延迟的执行器
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delay: Duration::ZERO,
            fail_indices: HashSet::new(),
            panic_indices: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// 每次执行前睡眠固定时长
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// 指定下标的任务返回失败结果
    pub fn failing_at(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.fail_indices = indices.into_iter().collect();
        self
    }

    /// 指定下标的任务直接panic，模拟执行单元崩溃
    pub fn panicking_at(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.panic_indices = indices.into_iter().collect();
        self
    }

    /// 按调用顺序返回已执行的任务下标
    pub fn executed_indices(&self) -> Vec<usize> {
        self.lock_calls().clone()
    }

    /// 同时在途任务数的历史峰值
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<usize>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TaskExecutor for MockTaskExecutor {
    async fn execute(&self, _job: &DispatchJob, index: usize) -> TaskOutcome {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        self.lock_calls().push(index);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_indices.contains(&index) {
            panic!("scripted panic at index {index}");
        }

        let duration_ms = self.delay.as_millis() as u64;
        if self.fail_indices.contains(&index) {
            TaskOutcome::failure(
                index,
                TaskErrorKind::HttpStatus(500),
                "scripted failure",
                duration_ms,
            )
        } else {
            TaskOutcome::success(index, "scripted success", duration_ms)
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
