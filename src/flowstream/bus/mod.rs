//! Fan-out notification bus for feature updates.
//!
//! Operators publish `(tuple id, value)` pairs as their summaries change;
//! every registered subscriber observes every publication. The bus
//! carries scalar `f64` values only. No delivery ordering is promised
//! between subscribers, but a subscriber registered before a `publish`
//! begins observes that event.

use crate::flowstream::error::{EngineError, Result};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, RwLock};

/// Downstream consumer of published feature updates
pub trait Subscriber: Send + Sync {
    /// Observe one published update
    ///
    /// Errors propagate to the publishing operator's caller.
    fn on_update(&self, tuple_id: u64, value: f64) -> Result<()>;
}

/// Registry of subscribers with fan-out publication
#[derive(Default)]
pub struct SubscriberBus {
    subscribers: RwLock<Vec<Arc<dyn Subscriber>>>,
}

impl SubscriberBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for all future publications
    pub fn register(&self, subscriber: Arc<dyn Subscriber>) {
        self.subscribers.write().unwrap().push(subscriber);
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().unwrap().len()
    }

    /// Publish one update to every subscriber in registration order
    ///
    /// Stops at the first subscriber error, which propagates to the
    /// caller; earlier subscribers will already have observed the event.
    pub fn publish(&self, tuple_id: u64, value: f64) -> Result<()> {
        let subscribers = self.subscribers.read().unwrap();
        for subscriber in subscribers.iter() {
            subscriber.on_update(tuple_id, value)?;
        }
        Ok(())
    }
}

/// Subscriber that forwards updates into an mpsc channel
///
/// Used by tests and demos to observe publications from the consuming
/// side without writing a bespoke subscriber.
pub struct ChannelSubscriber {
    sender: Mutex<Sender<(u64, f64)>>,
}

impl ChannelSubscriber {
    /// Create a subscriber and the receiving end of its channel
    pub fn new() -> (Self, Receiver<(u64, f64)>) {
        let (sender, receiver) = std::sync::mpsc::channel();
        (
            ChannelSubscriber {
                sender: Mutex::new(sender),
            },
            receiver,
        )
    }
}

impl Subscriber for ChannelSubscriber {
    fn on_update(&self, tuple_id: u64, value: f64) -> Result<()> {
        self.sender
            .lock()
            .unwrap()
            .send((tuple_id, value))
            .map_err(|_| EngineError::SubscriberError {
                message: "update channel disconnected".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let bus = SubscriberBus::new();
        let (first, first_rx) = ChannelSubscriber::new();
        let (second, second_rx) = ChannelSubscriber::new();
        bus.register(Arc::new(first));
        bus.register(Arc::new(second));

        bus.publish(9, 0.5).unwrap();

        assert_eq!(first_rx.try_recv().unwrap(), (9, 0.5));
        assert_eq!(second_rx.try_recv().unwrap(), (9, 0.5));
    }

    #[test]
    fn test_subscriber_error_propagates() {
        let bus = SubscriberBus::new();
        let (subscriber, receiver) = ChannelSubscriber::new();
        bus.register(Arc::new(subscriber));
        drop(receiver);

        assert!(bus.publish(1, 1.0).is_err());
    }
}
