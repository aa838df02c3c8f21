//! Domain data models
//!
//! Defines the agent roster and query result structures exchanged with the
//! orchestration service. Deserialization at the wire boundary is lenient:
//! unknown fields are ignored, optional fields default, and legacy response
//! shapes are accepted through explicit compatibility shims rather than
//! ad-hoc branching at call sites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Agent status enumeration
///
/// Represents the current lifecycle state of an agent as reported by the
/// service or driven by the query lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Agent is available and not working on anything
    #[default]
    Idle,
    /// Agent is currently handling a query
    Processing,
    /// Agent reported a failure
    Error,
    /// Agent is unreachable
    Disconnected,
}

impl AgentStatus {
    /// Parse a status string, mapping anything unrecognized to `Idle`
    ///
    /// Older service builds report statuses outside the known set
    /// (e.g. `"active"`); the client must tolerate them.
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "idle" => Self::Idle,
            "processing" => Self::Processing,
            "error" => Self::Error,
            "disconnected" => Self::Disconnected,
            _ => Self::Idle,
        }
    }

    /// Display color associated with this status
    pub fn color(&self) -> &'static str {
        match self {
            Self::Idle => "#4CAF50",
            Self::Processing => "#FF9800",
            Self::Error => "#F44336",
            Self::Disconnected => "#9E9E9E",
        }
    }
}

impl<'de> Deserialize<'de> for AgentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str_lossy(&value))
    }
}

/// Model classes known to the client, used for color and labeling
///
/// The wire `model` field stays a free-form string; this enum only drives
/// presentation hints, with [`ModelKind::Other`] as the fallback for any
/// model the client does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// General conversation model
    Llama3_2,
    /// Code analysis model
    Codellama,
    /// Data analysis model
    Mistral,
    /// Any model outside the known set
    Other,
}

impl ModelKind {
    /// Classify a model identifier
    pub fn from_name(name: &str) -> Self {
        match name {
            "llama3.2" => Self::Llama3_2,
            "codellama" => Self::Codellama,
            "mistral" => Self::Mistral,
            _ => Self::Other,
        }
    }

    /// Display color associated with this model class
    pub fn color(&self) -> &'static str {
        match self {
            Self::Llama3_2 => "#2196F3",
            Self::Codellama => "#9C27B0",
            Self::Mistral => "#FF5722",
            Self::Other => "#4CAF50",
        }
    }
}

/// A single addressable worker tracked by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Opaque unique identifier assigned by the service (or synthesized
    /// in mock mode)
    pub id: String,
    /// Human-readable label supplied at creation
    pub name: String,
    /// Identifier of the underlying model class
    pub model: String,
    /// Current lifecycle state
    #[serde(default)]
    pub status: AgentStatus,
    /// Free-text capability tags
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Creation timestamp; the live service may omit it
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Agent {
    /// Classify this agent's model for color/labeling purposes
    pub fn model_kind(&self) -> ModelKind {
        ModelKind::from_name(&self.model)
    }
}

/// Creation request for a new agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAgent {
    /// Human-readable label
    pub name: String,
    /// Model class identifier
    pub model: String,
    /// Free-text capability tags
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Per-agent entry of a query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AgentResponse {
    /// Identifier of the responding agent
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Name of the responding agent
    #[serde(default)]
    pub agent_name: Option<String>,
    /// Model that produced the response
    #[serde(default)]
    pub model: Option<String>,
    /// Response text, if the agent answered
    #[serde(default)]
    pub response: Option<String>,
    /// Error text, if the agent failed
    #[serde(default)]
    pub error: Option<String>,
    /// Time the agent took to answer, in seconds
    #[serde(default)]
    pub response_time: Option<f64>,
}

impl AgentResponse {
    /// Best available label for this entry: name, then id, then a stand-in
    pub fn label(&self) -> &str {
        self.agent_name
            .as_deref()
            .or(self.agent_id.as_deref())
            .unwrap_or("unknown")
    }
}

/// Normalized result of one query submission
///
/// Transient value handed directly to the caller; the store does not
/// retain query history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// The submitted query text
    pub query: String,
    /// The orchestrator's own response
    pub orchestrator_response: String,
    /// Per-agent responses, in service order
    pub agents_responses: Vec<AgentResponse>,
    /// Synthesized final answer, when the service produced one
    pub final_response: Option<String>,
    /// The orchestrator's synthesis reasoning
    pub reasoning: Option<String>,
    /// Total server-side processing time, in seconds
    pub processing_time: Option<f64>,
    /// Legacy single-response field, kept for older callers; always the
    /// best available response text
    pub response: String,
}

/// Wire shape of a roster response
///
/// The service historically returned a bare array; newer builds wrap it in
/// an object. Both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AgentsPayload {
    /// Object form: `{"agents": [...]}`
    Wrapped {
        /// The roster
        agents: Vec<Agent>,
    },
    /// Legacy form: a bare array
    Bare(Vec<Agent>),
}

impl AgentsPayload {
    /// Unwrap either payload form into the roster
    pub fn into_agents(self) -> Vec<Agent> {
        match self {
            Self::Wrapped { agents } => agents,
            Self::Bare(agents) => agents,
        }
    }
}

/// Raw wire shape of a query response, before normalization
///
/// Every field is optional so that older service builds (which sent only
/// `query` and `response`) still parse.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawQueryResponse {
    /// Echoed query text
    #[serde(default)]
    pub query: Option<String>,
    /// The orchestrator's own response
    #[serde(default)]
    pub orchestrator_response: Option<String>,
    /// Per-agent responses
    #[serde(default)]
    pub agents_responses: Vec<AgentResponse>,
    /// Synthesized final answer
    #[serde(default)]
    pub final_response: Option<String>,
    /// Synthesis reasoning
    #[serde(default)]
    pub reasoning: Option<String>,
    /// Server-side processing time, in seconds
    #[serde(default)]
    pub processing_time: Option<f64>,
    /// Legacy single-response field from older builds
    #[serde(default)]
    pub response: Option<String>,
}

impl RawQueryResponse {
    /// Normalize a raw response into a [`QueryResult`]
    ///
    /// `fallback_query` is used when the service does not echo the query
    /// back. Missing `orchestrator_response` falls back to the legacy
    /// `response` field.
    pub fn normalize(self, fallback_query: &str) -> QueryResult {
        let response = unified_response(&self.final_response, &self.orchestrator_response, &self.response);
        let orchestrator_response = self
            .orchestrator_response
            .or(self.response)
            .unwrap_or_default();
        QueryResult {
            query: self.query.unwrap_or_else(|| fallback_query.to_string()),
            orchestrator_response,
            agents_responses: self.agents_responses,
            final_response: self.final_response,
            reasoning: self.reasoning,
            processing_time: self.processing_time,
            response,
        }
    }
}

/// Compatibility shim: pick the best single response text
///
/// Precedence is `final_response`, then `orchestrator_response`, then the
/// legacy `response` field; empty string when none exist.
pub fn unified_response(
    final_response: &Option<String>,
    orchestrator_response: &Option<String>,
    legacy_response: &Option<String>,
) -> String {
    final_response
        .as_deref()
        .or(orchestrator_response.as_deref())
        .or(legacy_response.as_deref())
        .unwrap_or_default()
        .to_string()
}
