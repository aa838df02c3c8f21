//! Typed event notification
//!
//! A small callback registry shared by the network client (connectivity
//! and roster events) and the state store (state snapshots). Listener
//! panics are isolated per dispatch: one failing listener never prevents
//! the others from running, and never propagates to the emitter.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::Agent;

/// Events emitted by the network client
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Connectivity changed; carries the observed value
    ConnectionChange(bool),
    /// A fresh roster was received
    AgentsUpdate(Vec<Agent>),
    /// An operation exhausted its retries; carries the error message
    Error(String),
}

/// Handle identifying one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct RegistryInner<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// Registry of callbacks invoked with every emitted value
pub struct CallbackRegistry<T> {
    inner: Mutex<RegistryInner<T>>,
}

impl<T> CallbackRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner<T>> {
        // A listener panicking cannot poison this lock (dispatch happens
        // with the lock released), but recover anyway.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a listener; returns its removal handle
    pub fn add(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> ListenerId {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, Arc::new(callback)));
        ListenerId(id)
    }

    /// Remove a listener by handle
    ///
    /// Removes exactly one registration; repeated calls with the same
    /// handle are a no-op. Returns whether a listener was removed.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|(entry_id, _)| *entry_id != id.0);
        inner.entries.len() < before
    }

    /// Invoke every registered listener with `value`
    ///
    /// The listener list is snapshotted first, so a listener may register
    /// or remove listeners without deadlocking.
    pub fn emit(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = self
            .lock()
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(value))).is_err() {
                tracing::error!("Listener panicked during event dispatch");
            }
        }
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the registry has no listeners
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for CallbackRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
