//! Console front end for the orchestrator client
//!
//! A minimal stand-in for the visualization layer: wires configuration,
//! client, and store together, loads the roster, and optionally submits
//! one query passed on the command line.
//!
//! ```text
//! MOCK_MODE=1 console "what is the orchestrator doing"
//! ```

use orchestrator_client::client::ApiClient;
use orchestrator_client::config::Config;
use orchestrator_client::store::StateStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    info!(?config, "Starting orchestrator client");

    let client = ApiClient::new(config);
    let store = StateStore::new(client);

    let subscription = store.subscribe(|state| {
        info!(
            connected = state.connected,
            mode = ?state.connection_mode,
            agents = state.agents.len(),
            loading = state.loading,
            error = ?state.error,
            "State updated"
        );
    });

    let agents = store.load_agents().await?;
    println!("Roster ({} agents):", agents.len());
    for agent in &agents {
        println!(
            "  {} - {} [{}] {:?}",
            agent.id,
            agent.name,
            agent.model,
            agent.status
        );
    }

    if let Some(query) = std::env::args().nth(1) {
        let result = store.send_query(&query).await?;
        println!("\nQuery: {}", result.query);
        println!("Response: {}", result.response);
        for entry in &result.agents_responses {
            let text = entry
                .response
                .as_deref()
                .or(entry.error.as_deref())
                .unwrap_or("(no response)");
            println!("  {}: {}", entry.label(), text);
        }
        if let Some(reasoning) = &result.reasoning {
            println!("Reasoning: {reasoning}");
        }
        if let Some(seconds) = result.processing_time {
            println!("Processed in {seconds:.3}s");
        }
    }

    subscription.cancel();
    Ok(())
}
