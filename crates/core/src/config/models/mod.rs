pub mod app_config;
pub mod dispatch_upstream;
pub mod server_logging;

// Re-export main types for easier imports
pub use app_config::AppConfig;
pub use dispatch_upstream::{DispatchConfig, UpstreamConfig};
pub use server_logging::{LoggingConfig, ServerConfig};
