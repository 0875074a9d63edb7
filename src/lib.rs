//! # embedq
//!
//! `embedq` is an embeddable, in-process publish/subscribe message bus.
//! Producers publish messages tagged with a topic; subscribers registered on
//! that topic receive them synchronously on the publishing thread. A `Worker`
//! is a subscriber that moves user processing onto a thread pool and can
//! publish follow-up messages.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use embedq::{Broker, BrokerConnection, ExecutionPool, Message, Publisher, ThreadPool, WorkError, Worker, WorkerConfig};
//!
//! let broker = Arc::new(Broker::new());
//! let connection: Arc<dyn BrokerConnection> = Arc::new(broker.connect());
//! let pool: Arc<dyn ExecutionPool> = Arc::new(ThreadPool::new(4).unwrap());
//!
//! let _worker = Worker::spawn(
//!     WorkerConfig::new("orders.created", connection.clone(), pool),
//!     |m: &Message, out: &dyn Publisher| -> Result<(), WorkError> {
//!         let order = m.payload::<String>().ok_or_else(|| WorkError::msg("not an order"))?;
//!         out.publish(Message::new("orders.confirmed", format!("{order}-ok")));
//!         Ok(())
//!     },
//! );
//!
//! connection.publish(Message::new("orders.created", "order-42".to_string()));
//! ```
//!
//! ## Core Modules
//!
//! - `broker`: topics, messages and the subscription registry / dispatch engine.
//! - `client`: the `Subscriber` and `Publisher` capabilities.
//! - `connection`: the `BrokerConnection` boundary and its in-process implementation.
//! - `worker`: asynchronous workers and execution pools.
//! - `config`: loading settings for pools and logging.
//! - `utils`: error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod connection;
pub mod utils;
pub mod worker;

pub use broker::message::{Message, Payload};
pub use broker::topic::Topic;
pub use broker::{Broker, DeliveryReport};
pub use client::{FnPublisher, FnSubscriber, Publisher, Subscriber, subscriber_fn};
pub use connection::{BrokerConnection, IntraprocessBrokerConnection};
pub use utils::error::{BoxError, PoolError, WorkError};
pub use worker::{
    ErrorHandler, ExecutionPool, Task, ThreadPool, Work, Worker, WorkerConfig, WorkerPublisher,
};
