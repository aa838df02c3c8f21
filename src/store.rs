//! State store
//!
//! The single mutable source of truth for UI-facing application state.
//! Every mutation builds a fresh [`AppState`] snapshot (the previous value
//! is never mutated in place) and synchronously notifies every subscriber
//! before the mutating step returns. All state-changing operations go
//! through the network client; errors are recorded into `state.error` and
//! rethrown, so subscribers and direct callers both see the failure.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::events::{CallbackRegistry, ClientEvent, ListenerId};
use crate::models::{Agent, NewAgent, QueryResult};

/// How the client reached its connected state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Connected to a live service
    Real,
    /// Operating offline against synthetic data
    Mock,
}

/// One immutable snapshot of application state
///
/// Subscribers receive a fresh value on every change and must treat it as
/// read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct AppState {
    /// Whether the last health probe succeeded (always true in mock mode)
    pub connected: bool,
    /// How the connection was established, if at all
    pub connection_mode: Option<ConnectionMode>,
    /// The agent roster, in service order
    pub agents: Vec<Agent>,
    /// The currently selected agent
    ///
    /// Not invalidated if the agent later disappears from a refreshed
    /// roster; stale selections are an accepted simplification.
    pub selected_agent: Option<Agent>,
    /// Whether an operation is in flight
    pub loading: bool,
    /// Message of the most recent failure, cleared when a new operation
    /// starts
    pub error: Option<String>,
    /// When the roster was last replaced
    pub last_update: Option<DateTime<Utc>>,
}

/// Handle for detaching a state subscriber
///
/// Detaches exactly one registration; calling [`Subscription::cancel`]
/// again is a no-op. Dropping the handle does not detach.
pub struct Subscription {
    id: ListenerId,
    registry: Weak<CallbackRegistry<AppState>>,
}

impl Subscription {
    /// Detach the subscriber; returns whether a registration was removed
    pub fn cancel(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.remove(self.id))
            .unwrap_or(false)
    }
}

/// Publish/subscribe container owning the [`AppState`] singleton
///
/// Constructed once at the composition root and passed by handle to
/// collaborators; the store is the sole writer of its state.
pub struct StateStore {
    client: ApiClient,
    state: Mutex<AppState>,
    subscribers: Arc<CallbackRegistry<AppState>>,
}

impl StateStore {
    /// Create a store around the given client
    ///
    /// The store subscribes to the client's connectivity, roster, and
    /// error events so that out-of-band emissions are folded into state
    /// the same way as direct operations.
    pub fn new(client: ApiClient) -> Arc<Self> {
        let store = Arc::new(Self {
            client,
            state: Mutex::new(AppState::default()),
            subscribers: Arc::new(CallbackRegistry::new()),
        });

        let weak = Arc::downgrade(&store);
        store.client.on_event(move |event| {
            if let Some(store) = weak.upgrade() {
                store.apply_event(event);
            }
        });

        tracing::debug!("State store initialized");
        store
    }

    /// The underlying network client
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// A copy of the current state
    pub fn snapshot(&self) -> AppState {
        self.lock_state().clone()
    }

    /// Register a subscriber
    ///
    /// The callback is invoked once immediately with the current snapshot
    /// (late subscribers never miss the initial state) and thereafter on
    /// every state replacement.
    pub fn subscribe(&self, callback: impl Fn(&AppState) + Send + Sync + 'static) -> Subscription {
        callback(&self.snapshot());
        let id = self.subscribers.add(callback);
        Subscription {
            id,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    /// Load the roster, probing connectivity first
    ///
    /// Retries happen inside the client; this layer records the outcome
    /// and rethrows failures.
    pub async fn load_agents(&self) -> Result<Vec<Agent>, ClientError> {
        self.update(|mut state| {
            state.loading = true;
            state.error = None;
            state
        });

        let connected = self.client.check_connection().await;
        match self.client.get_agents().await {
            Ok(agents) => {
                let mode = self.mode_for(connected);
                let roster = agents.clone();
                self.update(move |mut state| {
                    state.agents = roster;
                    state.connected = connected;
                    state.connection_mode = mode;
                    state.loading = false;
                    state.last_update = Some(Utc::now());
                    state
                });
                tracing::info!(count = agents.len(), "Agents loaded");
                Ok(agents)
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Create an agent and append it to the roster
    pub async fn create_agent(&self, request: NewAgent) -> Result<Agent, ClientError> {
        self.update(|mut state| {
            state.loading = true;
            state.error = None;
            state
        });

        match self.client.create_agent(&request).await {
            Ok(agent) => {
                let created = agent.clone();
                self.update(move |mut state| {
                    state.agents.push(created);
                    state.loading = false;
                    state
                });
                Ok(agent)
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Submit a query; the result is handed to the caller, not retained
    pub async fn send_query(&self, query: &str) -> Result<QueryResult, ClientError> {
        self.update(|mut state| {
            state.loading = true;
            state.error = None;
            state
        });

        match self.client.send_query(query).await {
            Ok(result) => {
                self.update(|mut state| {
                    state.loading = false;
                    state
                });
                Ok(result)
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Select an agent by exact id
    ///
    /// A silent no-op when the id is absent from the roster: state is
    /// unchanged and no notification goes out. Returns whether the agent
    /// was found.
    pub fn select_agent(&self, id: &str) -> bool {
        let agent = self
            .lock_state()
            .agents
            .iter()
            .find(|agent| agent.id == id)
            .cloned();

        match agent {
            Some(agent) => {
                tracing::debug!(id = %agent.id, "Agent selected");
                self.update(move |mut state| {
                    state.selected_agent = Some(agent);
                    state
                });
                true
            }
            None => false,
        }
    }

    /// Fold a client event into state
    fn apply_event(&self, event: &ClientEvent) {
        match event {
            ClientEvent::ConnectionChange(connected) => {
                let mode = self.mode_for(*connected);
                let connected = *connected;
                self.update(move |mut state| {
                    state.connected = connected;
                    state.connection_mode = mode;
                    state
                });
            }
            ClientEvent::AgentsUpdate(agents) => {
                let agents = agents.clone();
                self.update(move |mut state| {
                    state.agents = agents;
                    state.last_update = Some(Utc::now());
                    state
                });
            }
            ClientEvent::Error(message) => {
                let message = message.clone();
                self.update(move |mut state| {
                    state.error = Some(message);
                    state.loading = false;
                    state
                });
            }
        }
    }

    fn record_failure(&self, err: &ClientError) {
        tracing::warn!(error = %err, "Operation failed");
        let message = err.to_string();
        self.update(move |mut state| {
            state.error = Some(message);
            state.loading = false;
            state
        });
    }

    fn mode_for(&self, connected: bool) -> Option<ConnectionMode> {
        if self.client.is_mock() {
            Some(ConnectionMode::Mock)
        } else if connected {
            Some(ConnectionMode::Real)
        } else {
            None
        }
    }

    /// Replace the state wholesale and notify every subscriber
    ///
    /// The lock is released before dispatch, so subscribers may read the
    /// store re-entrantly.
    fn update<F>(&self, replace: F) -> AppState
    where
        F: FnOnce(AppState) -> AppState,
    {
        let next = {
            let mut guard = self.lock_state();
            let next = replace(guard.clone());
            *guard = next.clone();
            next
        };
        self.subscribers.emit(&next);
        next
    }

    fn lock_state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
