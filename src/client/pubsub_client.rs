//! Client capabilities
//!
//! Anything that talks to a broker does so through two small traits:
//! `Subscriber` receives messages for topics it registered interest in, and
//! `Publisher` sends messages in. Closures qualify via `FnSubscriber` and
//! `FnPublisher`.

use std::fmt;
use std::sync::Arc;

use crate::broker::message::Message;

pub trait Subscriber: Send + Sync {
    /// Called by the broker on the publishing thread, once per publish call
    /// on a topic this subscriber is registered under.
    fn receive_message(&self, message: &Message);
}

pub trait Publisher: Send + Sync {
    fn publish(&self, message: Message);
}

/// Adapts a closure into a `Subscriber`.
pub struct FnSubscriber<F>(F);

impl<F> FnSubscriber<F>
where
    F: Fn(&Message) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Subscriber for FnSubscriber<F>
where
    F: Fn(&Message) + Send + Sync,
{
    fn receive_message(&self, message: &Message) {
        (self.0)(message)
    }
}

impl<F> fmt::Debug for FnSubscriber<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSubscriber")
    }
}

/// Adapts a closure into a `Publisher`.
pub struct FnPublisher<F>(F);

impl<F> FnPublisher<F>
where
    F: Fn(Message) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Publisher for FnPublisher<F>
where
    F: Fn(Message) + Send + Sync,
{
    fn publish(&self, message: Message) {
        (self.0)(message)
    }
}

impl<F> fmt::Debug for FnPublisher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnPublisher")
    }
}

/// Shorthand for a shared closure subscriber, ready to hand to a broker.
pub fn subscriber_fn<F>(f: F) -> Arc<dyn Subscriber>
where
    F: Fn(&Message) + Send + Sync + 'static,
{
    Arc::new(FnSubscriber::new(f))
}
