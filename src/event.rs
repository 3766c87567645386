//! Synchronous observer list.
//!
//! [`Emitter::fire`] calls every listener in subscription order before
//! returning. Listeners are snapshotted first, so a listener may drop its
//! own (or another) [`Subscription`] while being called.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

fn lock<T>(listeners: &Mutex<Listeners<T>>) -> MutexGuard<'_, Listeners<T>> {
    // A panicking listener runs outside the lock, so the list itself is
    // never left half-updated.
    listeners.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out point for events of type `T`.
pub struct Emitter<T> {
    listeners: Arc<Mutex<Listeners<T>>>,
}

impl<T: 'static> Emitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register `listener`. It stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut guard = lock(&self.listeners);
            let id = guard.next_id;
            guard.next_id += 1;
            guard.entries.push((id, Arc::new(listener)));
            id
        };

        let listeners: Weak<Mutex<Listeners<T>>> = Arc::downgrade(&self.listeners);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(listeners) = listeners.upgrade() {
                    lock(&listeners).entries.retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Deliver `event` to every current listener, in subscription order.
    pub fn fire(&self, event: &T) {
        let snapshot: Vec<Listener<T>> = lock(&self.listeners)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).entries.len()
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration handle returned by [`Emitter::subscribe`].
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unregister the listener now.
    pub fn unsubscribe(mut self) {
        self.remove_listener();
    }

    fn remove_listener(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove_listener();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}
