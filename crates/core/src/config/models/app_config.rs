use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    dispatch_upstream::{DispatchConfig, UpstreamConfig},
    server_logging::{LoggingConfig, ServerConfig},
};

/// 系统配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dispatch: DispatchConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序：
    /// 1. 内置默认值
    /// 2. TOML配置文件
    /// 3. 环境变量覆盖（前缀: SHARECAST_，层级分隔符: __）
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径，为None时按默认路径查找
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder()
            .set_default("server.bind_address", "0.0.0.0:5000")?
            .set_default("dispatch.max_workers", 10)?
            .set_default("dispatch.max_count", 500)?
            .set_default("dispatch.task_timeout_seconds", 8)?
            .set_default("dispatch.grace_period_seconds", 5)?
            .set_default("dispatch.default_share_delay_seconds", 0.5)?
            .set_default("upstream.share_url", "https://graph.facebook.com/me/feed")?
            .set_default(
                "upstream.token_url",
                "https://business.facebook.com/content_management",
            )?
            .set_default("upstream.user_agent", "Mozilla/5.0")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?;

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else {
            let default_paths = [
                "config/sharecast.toml",
                "sharecast.toml",
                "/etc/sharecast/config.toml",
            ];

            for path in &default_paths {
                if Path::new(path).exists() {
                    builder = builder.add_source(File::new(path, FileFormat::Toml));
                    break;
                }
            }
        }

        // 环境变量优先级最高，例如 SHARECAST_DISPATCH__MAX_WORKERS=3
        builder = builder.add_source(
            Environment::with_prefix("SHARECAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.validate()?;

        Ok(config)
    }

    /// 从TOML字符串加载配置
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;

        config.validate()?;
        Ok(config)
    }

    /// 将配置序列化为TOML字符串
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }

    /// 校验配置有效性
    pub fn validate(&self) -> Result<()> {
        self.server.validate().context("服务器配置验证失败")?;

        self.dispatch.validate().context("分发配置验证失败")?;

        self.upstream.validate().context("上游配置验证失败")?;

        self.logging.validate().context("日志配置验证失败")?;

        Ok(())
    }
}
