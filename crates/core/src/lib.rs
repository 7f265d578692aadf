pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::{AppConfig, DispatchConfig, LoggingConfig, ServerConfig, UpstreamConfig};
pub use errors::{DispatchError, DispatchResult};
// Re-export only specific items from models to avoid conflicts
pub use models::{DispatchJob, DispatchMode, JobResult, TaskErrorKind, TaskOutcome};
pub use traits::{DispatchService, TaskExecutor, TokenResolver};
