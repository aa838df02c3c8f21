//! HTTP client for the orchestration service
//!
//! All outbound communication lives here: a single-shot health probe and
//! retrying roster/creation/query operations, each with a per-attempt
//! timeout and linear backoff. With mock mode enabled, operations return
//! synthetic data after simulated latency instead of touching the network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::Config;
use crate::error::ClientError;
use crate::events::{CallbackRegistry, ClientEvent, ListenerId};
use crate::mock;
use crate::models::{Agent, AgentsPayload, NewAgent, QueryResult, RawQueryResponse};

/// Delay before attempt `attempt + 1`, under linear backoff
///
/// Attempts are numbered from 1; the wait after a failed attempt `k` is
/// `retry_delay * k`, so a budget of `n` attempts injects a cumulative
/// `retry_delay * (1 + 2 + … + (n - 1))` of waiting.
pub fn backoff_delay(retry_delay: Duration, attempt: u32) -> Duration {
    retry_delay * attempt
}

/// Client for the remote orchestration service
pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
    listeners: CallbackRegistry<ClientEvent>,
    connected: AtomicBool,
}

impl ApiClient {
    /// Create a client from the given configuration
    pub fn new(config: Config) -> Self {
        tracing::info!(
            base_url = %config.base_url,
            mock_mode = config.mock_mode,
            "API client initialized"
        );
        Self {
            http: reqwest::Client::new(),
            config,
            listeners: CallbackRegistry::new(),
            connected: AtomicBool::new(false),
        }
    }

    /// Create a client configured from environment variables
    pub fn from_env() -> Self {
        Self::new(Config::from_env())
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the client is in offline mock mode
    pub fn is_mock(&self) -> bool {
        self.config.mock_mode
    }

    /// Outcome of the most recent health probe
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Register an event listener; returns its removal handle
    pub fn on_event(&self, listener: impl Fn(&ClientEvent) + Send + Sync + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Remove a previously registered listener
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub(crate) fn emit(&self, event: ClientEvent) {
        self.listeners.emit(&event);
    }

    /// Probe service connectivity
    ///
    /// Single-shot (no retry); a failure of any kind is reported as
    /// `false`, never as an error. Emits a connectivity event with the
    /// observed value.
    pub async fn check_connection(&self) -> bool {
        if self.is_mock() {
            tracing::debug!("Mock mode enabled, simulating connection");
            self.connected.store(true, Ordering::Relaxed);
            self.emit(ClientEvent::ConnectionChange(true));
            return true;
        }

        let probe = self.attempt(self.http.get(self.endpoint("/health"))).await;
        let connected = match probe {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "Connection check failed");
                false
            }
        };
        self.connected.store(connected, Ordering::Relaxed);
        self.emit(ClientEvent::ConnectionChange(connected));
        connected
    }

    /// Fetch the agent roster
    ///
    /// Emits a roster event on success and an error event on retry
    /// exhaustion.
    pub async fn get_agents(&self) -> Result<Vec<Agent>, ClientError> {
        if self.is_mock() {
            tokio::time::sleep(mock::ROSTER_DELAY).await;
            let agents = mock::roster();
            tracing::debug!(count = agents.len(), "Returning mock roster");
            self.emit(ClientEvent::AgentsUpdate(agents.clone()));
            return Ok(agents);
        }

        let url = self.endpoint("/agents");
        let outcome: Result<Vec<Agent>, ClientError> = async {
            let response = self
                .request_with_retry("get_agents", || self.http.get(&url))
                .await?;
            let body = response.text().await?;
            let payload: AgentsPayload = serde_json::from_str(&body)?;
            Ok(payload.into_agents())
        }
        .await;

        match outcome {
            Ok(agents) => {
                tracing::info!(count = agents.len(), "Agents received");
                self.emit(ClientEvent::AgentsUpdate(agents.clone()));
                Ok(agents)
            }
            Err(err) => {
                self.emit(ClientEvent::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Create a new agent
    pub async fn create_agent(&self, request: &NewAgent) -> Result<Agent, ClientError> {
        if self.is_mock() {
            tokio::time::sleep(mock::CREATE_DELAY).await;
            let agent = mock::created_agent(request);
            tracing::debug!(id = %agent.id, "Mock agent created");
            return Ok(agent);
        }

        let url = self.endpoint("/agents");
        let outcome: Result<Agent, ClientError> = async {
            let response = self
                .request_with_retry("create_agent", || self.http.post(&url).json(request))
                .await?;
            let body = response.text().await?;
            let agent: Agent = serde_json::from_str(&body)?;
            Ok(agent)
        }
        .await;

        match outcome {
            Ok(agent) => {
                tracing::info!(id = %agent.id, name = %agent.name, "Agent created");
                Ok(agent)
            }
            Err(err) => {
                self.emit(ClientEvent::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Submit a query to the orchestrator
    ///
    /// The response is normalized into [`QueryResult`], accepting the
    /// legacy single-response shape from older service builds.
    pub async fn send_query(&self, query: &str) -> Result<QueryResult, ClientError> {
        if self.is_mock() {
            tokio::time::sleep(mock::QUERY_DELAY).await;
            tracing::debug!(query_len = query.len(), "Returning mock query result");
            return Ok(mock::query_result(query));
        }

        let url = self.endpoint("/query");
        let body = serde_json::json!({ "query": query });
        let outcome: Result<QueryResult, ClientError> = async {
            let response = self
                .request_with_retry("send_query", || self.http.post(&url).json(&body))
                .await?;
            let text = response.text().await?;
            let raw: RawQueryResponse = serde_json::from_str(&text)?;
            Ok(raw.normalize(query))
        }
        .await;

        match outcome {
            Ok(result) => {
                tracing::info!(
                    agents = result.agents_responses.len(),
                    processing_time = result.processing_time,
                    "Query result received"
                );
                Ok(result)
            }
            Err(err) => {
                self.emit(ClientEvent::Error(err.to_string()));
                Err(err)
            }
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// One request attempt under the per-attempt timeout
    ///
    /// A non-2xx response counts as a failure, same as a transport error.
    async fn attempt(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        let response = tokio::time::timeout(self.config.request_timeout, request.send())
            .await
            .map_err(|_| ClientError::Timeout)?
            .map_err(ClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::from_status(status));
        }
        Ok(response)
    }

    /// Bounded retry loop with linear backoff
    ///
    /// The builder closure is invoked once per attempt, since a request
    /// body cannot be reused after a send.
    async fn request_with_retry<F>(
        &self,
        operation: &str,
        build: F,
    ) -> Result<reqwest::Response, ClientError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("request", operation, request_id = %request_id);
        async {
            let mut attempt: u32 = 1;
            loop {
                match self.attempt(build()).await {
                    Ok(response) => {
                        tracing::debug!(attempt, "Request succeeded");
                        return Ok(response);
                    }
                    Err(err) if attempt < self.config.retry_attempts => {
                        let delay = backoff_delay(self.config.retry_delay, attempt);
                        tracing::warn!(
                            attempt,
                            max_attempts = self.config.retry_attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    Err(err) => {
                        tracing::error!(attempt, error = %err, "Request failed, retries exhausted");
                        return Err(err);
                    }
                }
            }
        }
        .instrument(span)
        .await
    }
}
