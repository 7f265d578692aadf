use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use sharecast_core::{DispatchJob, DispatchMode, JobResult, TaskOutcome};

use crate::error::{ApiError, ApiResult};
use crate::routes::AppState;

/// 批量分享请求
///
/// `maxWorkers` 与 `shareDelay` 沿用前端约定的驼峰命名，其余字段为小写。
/// 所有字段都可缺省，缺失的必填字段由引擎校验后统一报错。
#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub link: Option<String>,
    pub cookie: Option<String>,
    pub token: Option<String>,
    pub count: Option<i64>,
    pub mode: Option<String>,
    #[serde(rename = "maxWorkers")]
    pub max_workers: Option<i64>,
    #[serde(rename = "shareDelay")]
    pub share_delay: Option<f64>,
}

/// 批量分享响应
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub results: Vec<TaskOutcome>,
    pub success_count: usize,
    pub failed_count: usize,
    pub message: String,
    pub mode: DispatchMode,
}

impl From<JobResult> for ShareResponse {
    fn from(result: JobResult) -> Self {
        let message = format!(
            "Completed: {} successful, {} failed",
            result.success_count, result.failed_count
        );
        Self {
            results: result.outcomes,
            success_count: result.success_count,
            failed_count: result.failed_count,
            message,
            mode: result.mode,
        }
    }
}

/// 批量分享入口
pub async fn share_post(
    State(state): State<AppState>,
    payload: Result<Json<ShareRequest>, JsonRejection>,
) -> ApiResult<Json<ShareResponse>> {
    let Json(request) =
        payload.map_err(|_| ApiError::BadRequest("Invalid JSON body".to_string()))?;

    let mode = DispatchMode::from_request(request.mode.as_deref().unwrap_or("fast"));

    // Duration 不接受负值或非有限值，前者钳到 0，后者回退配置默认
    let delay_seconds = request
        .share_delay
        .unwrap_or(state.dispatch_config.default_share_delay_seconds)
        .max(0.0);
    let inter_task_delay = Duration::try_from_secs_f64(delay_seconds)
        .unwrap_or_else(|_| state.dispatch_config.default_share_delay());

    let job = DispatchJob::new(
        request.link.unwrap_or_default(),
        request.cookie.unwrap_or_default(),
        request.token.unwrap_or_default(),
        request.count.unwrap_or(1),
        mode,
        request
            .max_workers
            .unwrap_or(state.dispatch_config.max_workers as i64),
        inter_task_delay,
    );

    info!(
        job_id = %job.id,
        link = %job.link,
        count = job.count,
        mode = %job.mode,
        "收到批量分享请求"
    );

    let result = state.dispatch_service.run(job).await?;

    Ok(Json(ShareResponse::from(result)))
}
