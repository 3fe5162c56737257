use std::sync::{Arc, PoisonError, RwLock};

use crate::resources::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// Rows of one kind changed for some owner.
    Resource(ResourceKind),
    Profile,
    /// Sign-in, sign-out or registration.
    Session,
}

pub trait InvalidationSubscriber: Send + Sync {
    fn on_invalidate(&self, event: Invalidation);
}

/// Synchronous fan-out of invalidation events to every subscriber.
#[derive(Clone, Default)]
pub struct InvalidationBus {
    subscribers: Arc<RwLock<Vec<Arc<dyn InvalidationSubscriber>>>>,
}

impl InvalidationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: Arc<dyn InvalidationSubscriber>) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subscriber);
    }

    pub fn publish(&self, event: Invalidation) {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        tracing::debug!(?event, subscribers = subscribers.len(), "invalidation published");
        for subscriber in subscribers {
            subscriber.on_invalidate(event);
        }
    }
}
