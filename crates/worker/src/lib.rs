pub mod executors;
pub mod resolver;



pub use executors::{MockTaskExecutor, ShareExecutor};
pub use resolver::CookieTokenResolver;
