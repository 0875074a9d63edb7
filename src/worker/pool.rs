//! Execution pools
//!
//! Workers hand each received message to an `ExecutionPool` and return
//! immediately. `ThreadPool` is the pool this crate ships: it owns a tokio
//! runtime and runs tasks with `spawn_blocking`, so synchronous user work
//! gets dedicated threads. An application that already runs tokio can pass
//! its own `Handle` instead.
//!
//! With a single thread (`ThreadPool::single_threaded`) tasks run one at a
//! time in submission order.

use std::fmt;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tracing::debug;

use crate::config::PoolSettings;
use crate::utils::error::PoolError;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait ExecutionPool: Send + Sync {
    /// Schedule `task` and return without waiting for it.
    fn execute(&self, task: Task);
}

impl ExecutionPool for Handle {
    fn execute(&self, task: Task) {
        // detached; the JoinHandle is not needed
        drop(self.spawn_blocking(task));
    }
}

pub struct ThreadPool {
    runtime: Option<Runtime>,
    handle: Handle,
    threads: usize,
}

impl ThreadPool {
    pub fn new(threads: usize) -> Result<Self, PoolError> {
        Self::build(threads, &PoolSettings::default().thread_name)
    }

    pub fn from_settings(settings: &PoolSettings) -> Result<Self, PoolError> {
        Self::build(settings.worker_threads, &settings.thread_name)
    }

    pub fn single_threaded() -> Result<Self, PoolError> {
        Self::new(1)
    }

    fn build(threads: usize, thread_name: &str) -> Result<Self, PoolError> {
        if threads == 0 {
            return Err(PoolError::NoThreads);
        }
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(threads)
            .thread_name(thread_name)
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();
        debug!(threads, thread_name, "execution pool started");
        Ok(Self {
            runtime: Some(runtime),
            handle,
            threads,
        })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Stops the pool, waiting up to `timeout` for running tasks.
    pub fn shutdown(mut self, timeout: Duration) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(timeout);
        }
    }
}

impl ExecutionPool for ThreadPool {
    fn execute(&self, task: Task) {
        self.handle.execute(task);
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Dropping a runtime blocks, which is not allowed from async context.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("threads", &self.threads)
            .finish()
    }
}
