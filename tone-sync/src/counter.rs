//! Per-resource refresh counters.
//!
//! A counter is an invalidation signal: every [`RefreshCounter::increment`]
//! is delivered to each registered listener, which re-runs its fetch. There
//! is no coalescing; two increments mean two notifications.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tone_core::ResourceKind;

/// Something that re-derives its value when a counter advances.
pub trait RefreshListener: Send + Sync {
    fn on_refresh(self: Arc<Self>, token: u64);
}

#[derive(Default)]
struct CounterInner {
    value: u64,
    listeners: Vec<Weak<dyn RefreshListener>>,
}

/// Monotonic invalidation counter for one resource kind.
pub struct RefreshCounter {
    resource: ResourceKind,
    inner: Mutex<CounterInner>,
}

impl RefreshCounter {
    pub fn new(resource: ResourceKind) -> Self {
        Self {
            resource,
            inner: Mutex::new(CounterInner::default()),
        }
    }

    pub fn resource(&self) -> ResourceKind {
        self.resource
    }

    /// Current token. Starts at 0 and never decreases.
    pub fn value(&self) -> u64 {
        self.lock().value
    }

    /// Advance the token and notify every live listener with the new value.
    ///
    /// Listeners are called after the counter lock is released, so a
    /// listener may itself read the counter.
    pub fn increment(&self) -> u64 {
        let (token, listeners) = {
            let mut inner = self.lock();
            inner.value += 1;
            inner.listeners.retain(|listener| listener.strong_count() > 0);
            let live: Vec<_> = inner.listeners.iter().filter_map(Weak::upgrade).collect();
            (inner.value, live)
        };

        tracing::debug!(
            resource = %self.resource,
            token,
            listeners = listeners.len(),
            "refresh counter advanced",
        );
        for listener in listeners {
            listener.on_refresh(token);
        }
        token
    }

    /// Register a listener for the lifetime of its `Arc`.
    pub fn register(&self, listener: Weak<dyn RefreshListener>) {
        self.lock().listeners.push(listener);
    }

    fn lock(&self) -> MutexGuard<'_, CounterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RefreshCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("RefreshCounter")
            .field("resource", &self.resource)
            .field("value", &inner.value)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}
