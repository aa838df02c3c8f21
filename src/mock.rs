//! Synthetic data for offline operation
//!
//! With mock mode enabled the client never touches the network; this
//! module fabricates the roster, created agents, and query results it
//! hands out instead, after simulated latency.

use std::time::Duration;

use chrono::Utc;

use crate::models::{Agent, AgentResponse, AgentStatus, NewAgent, QueryResult};

/// Simulated latency of a mock roster fetch
pub(crate) const ROSTER_DELAY: Duration = Duration::from_millis(500);
/// Simulated latency of a mock agent creation
pub(crate) const CREATE_DELAY: Duration = Duration::from_millis(1000);
/// Simulated latency of a mock query
pub(crate) const QUERY_DELAY: Duration = Duration::from_millis(1500);

/// The built-in synthetic roster: three idle agents
pub fn roster() -> Vec<Agent> {
    let created_at = Some(Utc::now());
    vec![
        Agent {
            id: "agent-001".to_string(),
            name: "Code Analyzer".to_string(),
            model: "codellama".to_string(),
            status: AgentStatus::Idle,
            capabilities: tags(&["code-review", "analysis", "refactoring"]),
            created_at,
        },
        Agent {
            id: "agent-002".to_string(),
            name: "Data Analyst".to_string(),
            model: "mistral".to_string(),
            status: AgentStatus::Idle,
            capabilities: tags(&["data-analysis", "visualization", "reporting"]),
            created_at,
        },
        Agent {
            id: "agent-003".to_string(),
            name: "Conversation Agent".to_string(),
            model: "llama3.2".to_string(),
            status: AgentStatus::Idle,
            capabilities: tags(&["chat", "qa", "general-purpose"]),
            created_at,
        },
    ]
}

/// Synthesize a created agent from a creation request
///
/// The id is a time-based token, matching what the service would never
/// collide with in a single session.
pub fn created_agent(request: &NewAgent) -> Agent {
    Agent {
        id: format!("agent-{}", Utc::now().timestamp_millis()),
        name: request.name.clone(),
        model: request.model.clone(),
        status: AgentStatus::Idle,
        capabilities: request.capabilities.clone(),
        created_at: Some(Utc::now()),
    }
}

/// Synthesize a query result, keyed to recognized query substrings
///
/// Queries mentioning code, data, or a greeting get a themed response;
/// anything else gets a generic acknowledgement echoing the input.
pub fn query_result(query: &str) -> QueryResult {
    let lowered = query.to_lowercase();
    let orchestrator_response = if lowered.contains("code") {
        "The code question was routed to the code analysis agent; its review is included below.".to_string()
    } else if lowered.contains("data") || lowered.contains("analy") {
        "The data question was routed to the data analysis agent; its findings are included below.".to_string()
    } else if lowered.contains("hello") || lowered.starts_with("hi") {
        "Hello! The orchestrator and its agents are ready for your queries.".to_string()
    } else {
        format!("Mock response for: {query}")
    };

    let agents_responses: Vec<AgentResponse> = roster()
        .into_iter()
        .zip([0.42, 0.61, 0.85])
        .map(|(agent, response_time)| AgentResponse {
            response: Some(format!("[{}] mock answer to \"{query}\"", agent.name)),
            agent_id: Some(agent.id),
            agent_name: Some(agent.name),
            model: Some(agent.model),
            error: None,
            response_time: Some(response_time),
        })
        .collect();

    let final_response = Some(orchestrator_response.clone());
    let response = orchestrator_response.clone();
    QueryResult {
        query: query.to_string(),
        orchestrator_response,
        agents_responses,
        final_response,
        reasoning: Some("Synthesized offline from the three mock agent responses".to_string()),
        processing_time: Some(1.5),
        response,
    }
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
