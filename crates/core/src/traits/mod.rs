pub mod dispatch;
pub mod executor;
pub mod resolver;

pub use dispatch::*;
pub use executor::*;
pub use resolver::*;
