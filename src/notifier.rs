//! Locale change broadcast.
//!
//! Listeners are plain callbacks registered on a [`ChangeNotifier`] and
//! called synchronously, in registration order, each time the active locale
//! switches. Unsubscribing during a broadcast skips that listener if it has
//! not run yet and leaves every other listener alone. Listeners added during
//! a broadcast are first called on the next one.

use std::sync::atomic::{
    AtomicU64,
    Ordering,
};
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
};

use serde::Serialize;

use crate::bundle::Bundle;
use crate::types::Source;

/// Payload broadcast after a successful locale switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationChanged {
    /// The newly active bundle
    pub strings: Bundle,
    /// Source of the newly active bundle
    pub src: Source,
}

impl TranslationChanged {
    /// Event name listeners subscribe under.
    pub const NAME: &'static str = "translationChanged";
}

/// Handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(
    /// Unique per notifier, never reused
    u64,
);

/// A registered callback.
type Listener = Arc<dyn Fn(&TranslationChanged) + Send + Sync>;

/// Publish/subscribe channel for [`TranslationChanged`] events.
#[derive(Default)]
pub struct ChangeNotifier {
    /// Next id handed out by `subscribe`
    next_id: AtomicU64,
    /// Registered listeners in registration order
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listener_count", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener list; a poisoned lock is recovered since a panicking listener
    /// runs outside of it.
    fn listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&TranslationChanged) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, Arc::new(callback)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    #[must_use]
    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.listeners().iter().any(|(listener_id, _)| *listener_id == id)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    /// Call every listener registered when the broadcast starts.
    ///
    /// Returns how many listeners were called.
    pub fn broadcast(&self, event: &TranslationChanged) -> usize {
        // Snapshot so listeners can (un)subscribe without deadlocking.
        let snapshot: Vec<(ListenerId, Listener)> = self.listeners().clone();

        let mut delivered = 0;
        for (id, listener) in &snapshot {
            if !self.is_subscribed(*id) {
                continue;
            }
            listener(event);
            delivered += 1;
        }

        tracing::debug!(src = %event.src, delivered, "Broadcast {}", TranslationChanged::NAME);
        delivered
    }
}
