//! Subscriber handles
//!
//! The registry stores subscribers as `SubscriberHandle`s. A handle's identity
//! is the address of the shared allocation it wraps, never the handle itself,
//! so a handle built at unsubscribe time matches the one stored at subscribe
//! time as long as both wrap clones of the same `Arc`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::client::Subscriber;

#[derive(Clone)]
pub struct SubscriberHandle(Arc<dyn Subscriber>);

impl SubscriberHandle {
    pub fn new(subscriber: Arc<dyn Subscriber>) -> Self {
        Self(subscriber)
    }

    /// Builds a handle for lookups without the caller giving up its `Arc`.
    pub fn of(subscriber: &Arc<dyn Subscriber>) -> Self {
        Self(Arc::clone(subscriber))
    }

    pub fn subscriber(&self) -> &Arc<dyn Subscriber> {
        &self.0
    }

    // Thin data pointer; the vtable half of the fat pointer is not part of
    // identity since the same object can be reached through different vtables.
    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for SubscriberHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl Eq for SubscriberHandle {}

impl Hash for SubscriberHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for SubscriberHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberHandle({:p})", self.addr())
    }
}
