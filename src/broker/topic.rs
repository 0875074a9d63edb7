//! Topic identifiers
//!
//! A `Topic` names a message channel. Topics are opaque labels compared by
//! value: two topics built from the same label are equal and hash equal no
//! matter where they were created. There is no wildcard or pattern matching.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(Arc<str>);

impl Topic {
    /// Create a topic from its label.
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Topic {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
