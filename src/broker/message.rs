//! Message definitions for the broker
//!
//! A `Message` pairs exactly one `Topic` with one payload. The payload is
//! held behind an `Arc`, so cloning a message (which the broker does once per
//! worker it hands the message to) shares the payload instead of copying it.
//!
//! Payloads are opaque to the broker. Subscribers read them back with a typed
//! downcast:
//!
//! ```rust
//! use embedq::{Message, Topic};
//!
//! let msg = Message::new(Topic::from("orders.created"), String::from("order-42"));
//! assert_eq!(msg.payload::<String>().map(String::as_str), Some("order-42"));
//! assert!(msg.payload::<u64>().is_none());
//! ```
//!
//! The same payload instance reaches every subscriber of a publish call, so
//! subscribers must treat it as read-only (or synchronize internally).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::broker::topic::Topic;

pub type Payload = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
pub struct Message {
    topic: Topic,
    payload: Payload,
}

impl Message {
    pub fn new<T>(topic: impl Into<Topic>, payload: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            topic: topic.into(),
            payload: Arc::new(payload),
        }
    }

    /// Build a message around a payload that is already shared.
    pub fn from_shared(topic: impl Into<Topic>, payload: Payload) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// The payload, if it is a `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    pub fn payload_any(&self) -> &Payload {
        &self.payload
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}
