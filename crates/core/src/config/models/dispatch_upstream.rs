use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub max_workers: usize,
    pub max_count: i64,
    pub task_timeout_seconds: u64,
    pub grace_period_seconds: u64,
    pub default_share_delay_seconds: f64,
}

impl DispatchConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_workers == 0 {
            return Err(anyhow::anyhow!("工作池容量必须大于0"));
        }

        if self.max_count <= 0 {
            return Err(anyhow::anyhow!("份数上限必须大于0"));
        }

        if self.task_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("任务超时时间必须大于0"));
        }

        if self.grace_period_seconds == 0 {
            return Err(anyhow::anyhow!("宽限期必须大于0"));
        }

        if !self.default_share_delay_seconds.is_finite() || self.default_share_delay_seconds < 0.0 {
            return Err(anyhow::anyhow!("默认任务间延迟必须是非负的有限值"));
        }

        Ok(())
    }

    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_seconds)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_seconds)
    }

    pub fn default_share_delay(&self) -> Duration {
        Duration::from_secs_f64(self.default_share_delay_seconds)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_workers: 10,
            max_count: 500,
            task_timeout_seconds: 8,
            grace_period_seconds: 5,
            default_share_delay_seconds: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub share_url: String,
    pub token_url: String,
    pub user_agent: String,
}

impl UpstreamConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [("share_url", &self.share_url), ("token_url", &self.token_url)] {
            if url.is_empty() {
                return Err(anyhow::anyhow!("上游地址{name}不能为空"));
            }

            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow::anyhow!("上游地址{name}必须以http://或https://开头: {url}"));
            }
        }

        if self.user_agent.is_empty() {
            return Err(anyhow::anyhow!("User-Agent不能为空"));
        }

        Ok(())
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            share_url: "https://graph.facebook.com/me/feed".to_string(),
            token_url: "https://business.facebook.com/content_management".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}
