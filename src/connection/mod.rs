//! The `connection` module is the boundary every producer and consumer talks
//! through.
//!
//! `BrokerConnection` bundles subscription management with `Publisher`. The
//! in-process implementation, `IntraprocessBrokerConnection`, forwards each
//! call straight to a shared `Broker`. Other implementations (for example one
//! backed by a network transport) must keep the same contract: idempotent
//! subscribe, no-op unsubscribe of unknown subscribers, and publish that never
//! surfaces dispatch failures to the caller.

pub mod intraprocess;

use std::sync::Arc;

use crate::broker::topic::Topic;
use crate::client::{Publisher, Subscriber};

pub use intraprocess::IntraprocessBrokerConnection;

pub trait BrokerConnection: Publisher {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber>, topic: Topic);

    fn unsubscribe(&self, subscriber: &Arc<dyn Subscriber>, topic: &Topic);

    fn unsubscribe_all(&self, subscriber: &Arc<dyn Subscriber>);
}
