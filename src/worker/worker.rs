//! Worker
//!
//! A `Worker` subscribes itself to one topic when it is spawned. Every message
//! it receives is handed to its execution pool, and the user's `Work` runs
//! there with a publish-only handle back to the same connection.
//!
//! Failures in user work (an `Err` or a panic) stay inside the worker: they go
//! to the configured error handler, or are discarded when there is none. They
//! never reach the broker, other workers, or the pool thread.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, trace};
use uuid::Uuid;

use crate::broker::message::Message;
use crate::broker::topic::Topic;
use crate::client::{Publisher, Subscriber};
use crate::connection::BrokerConnection;
use crate::utils::error::{WorkError, panic_message};
use crate::worker::pool::ExecutionPool;

pub type ErrorHandler = Arc<dyn Fn(WorkError) + Send + Sync>;

/// The processing a worker applies to each received message.
pub trait Work: Send + Sync + 'static {
    fn run(&self, input: &Message, publisher: &dyn Publisher) -> Result<(), WorkError>;
}

impl<F> Work for F
where
    F: Fn(&Message, &dyn Publisher) -> Result<(), WorkError> + Send + Sync + 'static,
{
    fn run(&self, input: &Message, publisher: &dyn Publisher) -> Result<(), WorkError> {
        self(input, publisher)
    }
}

#[derive(Clone)]
pub struct WorkerConfig {
    pub listen_topic: Topic,
    pub connection: Arc<dyn BrokerConnection>,
    pub pool: Arc<dyn ExecutionPool>,
    pub on_error: Option<ErrorHandler>,
}

impl WorkerConfig {
    pub fn new(
        listen_topic: impl Into<Topic>,
        connection: Arc<dyn BrokerConnection>,
        pool: Arc<dyn ExecutionPool>,
    ) -> Self {
        Self {
            listen_topic: listen_topic.into(),
            connection,
            pool,
            on_error: None,
        }
    }

    pub fn on_error<H>(mut self, handler: H) -> Self
    where
        H: Fn(WorkError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for WorkerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerConfig")
            .field("listen_topic", &self.listen_topic)
            .field("on_error", &self.on_error.is_some())
            .finish_non_exhaustive()
    }
}

/// Publish-only view of a connection, given to user work.
#[derive(Clone)]
pub struct WorkerPublisher {
    target: Arc<dyn BrokerConnection>,
}

impl Publisher for WorkerPublisher {
    fn publish(&self, message: Message) {
        self.target.publish(message);
    }
}

// Everything a pool task needs, shared between the worker and its tasks.
struct Core {
    listen_topic: Topic,
    work: Box<dyn Work>,
    publisher: WorkerPublisher,
    on_error: Option<ErrorHandler>,
}

impl Core {
    fn process(&self, message: &Message) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.work.run(message, &self.publisher)
        }))
        .unwrap_or_else(|cause| Err(WorkError::Panicked(panic_message(cause.as_ref()))));

        let Err(err) = outcome else {
            trace!(topic = %self.listen_topic, "work completed");
            return;
        };

        match &self.on_error {
            Some(handler) => {
                if let Err(cause) = panic::catch_unwind(AssertUnwindSafe(|| handler(err))) {
                    error!(topic = %self.listen_topic, "error handler panicked: {}", panic_message(cause.as_ref()));
                }
            }
            None => debug!(topic = %self.listen_topic, error = %err, "work error discarded"),
        }
    }
}

pub struct Worker {
    id: Uuid,
    connection: Arc<dyn BrokerConnection>,
    pool: Arc<dyn ExecutionPool>,
    core: Arc<Core>,
}

impl Worker {
    /// Builds a worker and subscribes it to `config.listen_topic`.
    ///
    /// The subscription is in place when this returns, so a message published
    /// right afterwards is seen by the worker.
    pub fn spawn<W: Work>(config: WorkerConfig, work: W) -> Arc<Self> {
        let WorkerConfig {
            listen_topic,
            connection,
            pool,
            on_error,
        } = config;

        let core = Core {
            listen_topic: listen_topic.clone(),
            work: Box::new(work),
            publisher: WorkerPublisher {
                target: Arc::clone(&connection),
            },
            on_error,
        };
        let worker = Arc::new(Self {
            id: Uuid::new_v4(),
            connection,
            pool,
            core: Arc::new(core),
        });

        let subscriber: Arc<dyn Subscriber> = worker.clone();
        worker.connection.subscribe(subscriber, listen_topic);
        debug!(%worker, "worker subscribed");
        worker
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn listen_topic(&self) -> &Topic {
        &self.core.listen_topic
    }

    /// Removes this worker from every topic on its connection. Tasks already
    /// submitted still run.
    pub fn unsubscribe(self: &Arc<Self>) {
        let subscriber: Arc<dyn Subscriber> = self.clone();
        self.connection.unsubscribe_all(&subscriber);
        debug!(worker = %self, "worker unsubscribed");
    }
}

impl Subscriber for Worker {
    fn receive_message(&self, message: &Message) {
        let core = Arc::clone(&self.core);
        let message = message.clone();
        self.pool.execute(Box::new(move || core.process(&message)));
    }
}

impl fmt::Display for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Worker#{} << {}", self.id, self.core.listen_topic)
    }
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("listen_topic", &self.core.listen_topic)
            .finish_non_exhaustive()
    }
}
