//! The `error` module defines the error types used within `embedq`.
//!
//! Dispatch itself never returns errors to publishers. What can fail is user
//! work running inside a `Worker` (`WorkError`) and building an execution
//! pool (`PoolError`).

use std::any::Any;
use std::error::Error as StdError;

use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A failure raised while a worker processed a message.
#[derive(Debug, Error)]
pub enum WorkError {
    #[error("work failed: {0}")]
    Failed(#[source] BoxError),

    #[error("work failed: {0}")]
    Message(String),

    #[error("work panicked: {0}")]
    Panicked(String),
}

impl WorkError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }
}

impl From<BoxError> for WorkError {
    fn from(err: BoxError) -> Self {
        Self::Failed(err)
    }
}

impl From<std::io::Error> for WorkError {
    fn from(err: std::io::Error) -> Self {
        Self::Failed(Box::new(err))
    }
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to build execution pool: {0}")]
    Build(#[from] std::io::Error),

    #[error("execution pool needs at least one thread")]
    NoThreads,
}

/// Best-effort text of a caught panic payload.
pub fn panic_message(cause: &(dyn Any + Send)) -> String {
    if let Some(s) = cause.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
