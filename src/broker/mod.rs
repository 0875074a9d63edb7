pub mod engine;
pub mod handle;
pub mod message;
pub mod topic;

pub use engine::{Broker, DeliveryReport};

#[cfg(test)]
mod tests;
