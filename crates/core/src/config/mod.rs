//! 配置管理
//!
//! 提供类型安全的系统配置，支持多配置源加载。
//!
//! # 加载顺序
//!
//! 1. 内置默认值
//! 2. TOML配置文件（显式路径或默认路径）
//! 3. 环境变量覆盖（前缀: SHARECAST_）
//!
//! 加载完成后对每个配置段做统一校验，非法配置在启动阶段即报错。

pub mod models;

pub use models::{AppConfig, DispatchConfig, LoggingConfig, ServerConfig, UpstreamConfig};
