//! Broker engine
//!
//! This module contains the in-process broker responsible for:
//! - keeping the registry of topics and their subscribers
//! - dispatching published messages to the subscribers of a topic
//!
//! Concurrency and usage notes:
//! - The broker is internally synchronized and is meant to be shared as
//!   `Arc<Broker>`; every operation takes `&self`.
//! - Each topic's subscriber set is copy-on-write. Publishing clones the
//!   `Arc` of the set under a read lock and delivers after the lock is
//!   released, so a publish call sees exactly the subscribers registered at
//!   the moment of lookup, and subscribers may call back into the broker
//!   from `receive_message` without deadlocking.
//! - Delivery happens on the publisher's thread. "Reliable" publish means
//!   delivery to that in-memory snapshot only: nothing is stored, acked or
//!   retried.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, trace};

use crate::broker::handle::SubscriberHandle;
use crate::broker::message::Message;
use crate::broker::topic::Topic;
use crate::client::Subscriber;
use crate::connection::IntraprocessBrokerConnection;
use crate::utils::error::panic_message;

type Registry = HashMap<Topic, Arc<HashSet<SubscriberHandle>>>;

/// Outcome of a single publish call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    /// Subscribers whose `receive_message` panicked.
    pub failed: usize,
}

impl DeliveryReport {
    pub fn total(&self) -> usize {
        self.delivered + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Default)]
pub struct Broker {
    topics: RwLock<Registry>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for wrapping a shared broker in an in-process connection.
    pub fn connect(self: &Arc<Self>) -> IntraprocessBrokerConnection {
        IntraprocessBrokerConnection::new(self)
    }

    // The registry is consistent between statements, so a panic on another
    // thread while holding the lock leaves nothing half-written.
    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.topics.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.topics.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `subscriber` under `topic`. Subscribing twice is a no-op.
    pub fn add_subscription(&self, subscriber: Arc<dyn Subscriber>, topic: Topic) {
        let handle = SubscriberHandle::new(subscriber);
        let mut topics = self.write();
        let set = topics.entry(topic.clone()).or_default();
        if set.contains(&handle) {
            trace!(%topic, ?handle, "duplicate subscription ignored");
            return;
        }
        Arc::make_mut(set).insert(handle);
        debug!(%topic, subscribers = set.len(), "subscription added");
    }

    /// Removes `subscriber` from `topic`, if it is there. Drops the topic
    /// once nobody is left on it.
    pub fn remove_subscription(&self, subscriber: &Arc<dyn Subscriber>, topic: &Topic) {
        let handle = SubscriberHandle::of(subscriber);
        let mut topics = self.write();
        let Some(set) = topics.get_mut(topic) else {
            return;
        };
        if !set.contains(&handle) {
            return;
        }
        Arc::make_mut(set).remove(&handle);
        let remaining = set.len();
        if remaining == 0 {
            topics.remove(topic);
        }
        debug!(%topic, remaining, "subscription removed");
    }

    /// Removes `subscriber` from every topic it is registered under.
    pub fn remove_subscriber(&self, subscriber: &Arc<dyn Subscriber>) {
        let handle = SubscriberHandle::of(subscriber);
        let mut removed = 0usize;
        self.write().retain(|_, set| {
            if set.contains(&handle) {
                Arc::make_mut(set).remove(&handle);
                removed += 1;
            }
            !set.is_empty()
        });
        debug!(?handle, topics = removed, "subscriber removed");
    }

    /// Delivers `message` to every subscriber registered under its topic at
    /// the time of the call.
    ///
    /// A subscriber that panics is logged and counted in the returned report;
    /// the remaining subscribers still receive the message and the panic does
    /// not propagate to the caller.
    pub fn publish_message_reliable(&self, message: &Message) -> DeliveryReport {
        let topic = message.topic();
        let snapshot = self.read().get(topic).cloned();
        let mut report = DeliveryReport::default();

        let Some(subscribers) = snapshot else {
            debug!(%topic, "no subscribers for topic");
            return report;
        };

        for handle in subscribers.iter() {
            let delivery =
                panic::catch_unwind(AssertUnwindSafe(|| handle.subscriber().receive_message(message)));
            match delivery {
                Ok(()) => {
                    trace!(%topic, ?handle, "delivered");
                    report.delivered += 1;
                }
                Err(cause) => {
                    error!(%topic, ?handle, "subscriber panicked during delivery: {}", panic_message(cause.as_ref()));
                    report.failed += 1;
                }
            }
        }

        debug!(%topic, delivered = report.delivered, failed = report.failed, "message published");
        report
    }

    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.read().get(topic).map_or(0, |set| set.len())
    }

    pub fn is_subscribed(&self, subscriber: &Arc<dyn Subscriber>, topic: &Topic) -> bool {
        let handle = SubscriberHandle::of(subscriber);
        self.read().get(topic).is_some_and(|set| set.contains(&handle))
    }

    /// Topics that currently have at least one subscriber.
    pub fn topics(&self) -> Vec<Topic> {
        self.read().keys().cloned().collect()
    }
}

impl fmt::Debug for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broker")
            .field("topics", &self.read().len())
            .finish()
    }
}
