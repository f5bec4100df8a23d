//! Token-based listener lists.
//!
//! Each notification type gets its own `ObserverList`; a component registers
//! only for the events it needs and keeps the returned `Subscription` so it
//! can unregister on teardown.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subscription(u64);

pub struct ObserverList<E> {
    next_id: u64,
    observers: Vec<(Subscription, Box<dyn FnMut(&E)>)>,
}

impl<E> Default for ObserverList<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            observers: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for ObserverList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<E> ObserverList<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, observer: F) -> Subscription
    where
        F: FnMut(&E) + 'static,
    {
        let token = Subscription(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.observers.push((token, Box::new(observer)));
        token
    }

    /// Returns `false` if the token was not registered.
    pub fn unsubscribe(&mut self, token: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != token);
        self.observers.len() != before
    }

    pub fn notify(&mut self, event: &E) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
