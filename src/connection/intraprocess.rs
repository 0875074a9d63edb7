//! In-process connection
//!
//! Wraps a `Broker` owned elsewhere. The connection only keeps a weak
//! reference: the broker lives as long as its owner holds it, and a broker's
//! registry may hold workers that in turn hold this connection. Once the
//! broker is gone every call on the connection is a no-op.
//!
//! Clones share the same broker, so a connection can be handed to as many
//! workers and publishers as needed.

use std::sync::{Arc, Weak};

use tracing::debug;

use crate::broker::Broker;
use crate::broker::message::Message;
use crate::broker::topic::Topic;
use crate::client::{Publisher, Subscriber};
use crate::connection::BrokerConnection;

#[derive(Debug, Clone)]
pub struct IntraprocessBrokerConnection {
    broker: Weak<Broker>,
}

impl IntraprocessBrokerConnection {
    pub fn new(broker: &Arc<Broker>) -> Self {
        Self {
            broker: Arc::downgrade(broker),
        }
    }

    /// The broker, if its owner still holds it.
    pub fn broker(&self) -> Option<Arc<Broker>> {
        self.broker.upgrade()
    }

    fn with_broker(&self, op: &str, f: impl FnOnce(&Broker)) {
        match self.broker.upgrade() {
            Some(broker) => f(&broker),
            None => debug!(op, "broker dropped; ignoring call"),
        }
    }
}

impl Publisher for IntraprocessBrokerConnection {
    fn publish(&self, message: Message) {
        self.with_broker("publish", |broker| {
            broker.publish_message_reliable(&message);
        });
    }
}

impl BrokerConnection for IntraprocessBrokerConnection {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber>, topic: Topic) {
        self.with_broker("subscribe", |broker| broker.add_subscription(subscriber, topic));
    }

    fn unsubscribe(&self, subscriber: &Arc<dyn Subscriber>, topic: &Topic) {
        self.with_broker("unsubscribe", |broker| broker.remove_subscription(subscriber, topic));
    }

    fn unsubscribe_all(&self, subscriber: &Arc<dyn Subscriber>) {
        self.with_broker("unsubscribe_all", |broker| broker.remove_subscriber(subscriber));
    }
}
