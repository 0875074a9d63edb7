//! The `utils` module provides shared definitions used across `embedq`:
//! error types and logging setup.

pub mod error;
pub mod logging;
