//! The `client` module defines what it means to take part in the bus.
//!
//! It provides the `Subscriber` and `Publisher` capability traits and closure
//! adapters for both.

pub mod pubsub_client;
pub use pubsub_client::{FnPublisher, FnSubscriber, Publisher, Subscriber, subscriber_fn};
