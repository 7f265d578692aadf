//! Dispatch Engine
//!
//! This crate drives the execution of share jobs: it validates the job,
//! tightens the requested concurrency to the configured ceiling, runs the
//! tasks through the selected strategy and folds every outcome into a
//! single aggregate result.

pub mod aggregator;
pub mod engine;
pub mod strategies;

// Re-export key components used by the composition root
pub use aggregator::ResultAggregator;
pub use engine::DispatchEngine;
pub use strategies::{ConcurrentStrategy, DispatchStrategy, SequentialStrategy};
