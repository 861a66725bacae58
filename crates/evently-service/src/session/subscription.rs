//! Session change listeners

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::Serialize;

use evently_core::AuthChangeEvent;

use crate::dto::ProfileResponse;

/// Delivered to every live listener after the session changes
#[derive(Debug, Clone, Serialize)]
pub struct SessionNotice {
    pub event: AuthChangeEvent,
    pub user: Option<ProfileResponse>,
    /// Views showing session-dependent data should re-fetch
    pub refresh: bool,
}

type Callback = Arc<dyn Fn(&SessionNotice) + Send + Sync>;

struct Listener {
    id: u64,
    alive: Arc<AtomicBool>,
    callback: Callback,
}

#[derive(Default)]
struct Inner {
    next_id: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
}

/// Registry of listeners for one browser session
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    inner: Arc<Inner>,
}

impl Listeners {
    pub(crate) fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SessionNotice) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let alive = Arc::new(AtomicBool::new(true));
        self.inner.listeners.lock().push(Listener {
            id,
            alive: alive.clone(),
            callback: Arc::new(callback),
        });

        Subscription {
            id,
            alive,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `notice` to every listener still alive at call time
    pub(crate) fn notify(&self, notice: &SessionNotice) {
        // Callbacks run outside the lock so they may subscribe or unsubscribe
        let snapshot: Vec<(Arc<AtomicBool>, Callback)> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|l| (l.alive.clone(), l.callback.clone()))
            .collect();

        for (alive, callback) in snapshot {
            if alive.load(Ordering::Acquire) {
                callback(notice);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("count", &self.len()).finish()
    }
}

/// Handle to a registered listener; dropping it unregisters the listener
#[derive(Debug)]
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription {
    id: u64,
    alive: Arc<AtomicBool>,
    registry: Weak<Inner>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Unregister now; equivalent to dropping the subscription
    pub fn unsubscribe(self) {}

    fn detach(&self) {
        self.alive.store(false, Ordering::Release);
        if let Some(inner) = self.registry.upgrade() {
            inner.listeners.lock().retain(|l| l.id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
