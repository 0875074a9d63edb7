//! The `worker` module runs user logic off the dispatch path.
//!
//! - `worker`: the `Worker` subscriber, its configuration and the `Work` trait.
//! - `pool`: the `ExecutionPool` abstraction and the tokio-backed `ThreadPool`.

pub mod pool;
#[allow(clippy::module_inception)]
pub mod worker;

pub use pool::{ExecutionPool, Task, ThreadPool};
pub use worker::{ErrorHandler, Work, Worker, WorkerConfig, WorkerPublisher};
