//! Integration tests for the HTTP client against a mock service
//!
//! These tests verify the live-mode request path:
//! 1. Roster parsing for both wire shapes
//! 2. Agent creation request bodies
//! 3. Query normalization, including the legacy response shape
//! 4. Retry exhaustion, backoff timing, and timeout translation

use std::time::{Duration, Instant};

use mockito::{Matcher, Server};
use orchestrator_client::client::ApiClient;
use orchestrator_client::config::Config;
use orchestrator_client::error::ClientError;
use orchestrator_client::events::ClientEvent;
use orchestrator_client::models::NewAgent;
use serial_test::serial;
use std::sync::{Arc, Mutex};

/// Helper to create a live-mode client pointed at a test server
fn live_client(base_url: String) -> ApiClient {
    ApiClient::new(Config {
        base_url,
        request_timeout: Duration::from_millis(2000),
        retry_attempts: 3,
        retry_delay: Duration::from_millis(25),
        mock_mode: false,
    })
}

#[tokio::test]
#[serial]
async fn test_get_agents_wrapped_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/agents")
        .with_status(200)
        .with_body(
            r#"{"agents": [
                {"id": "agent-001", "name": "Code Analyzer", "model": "codellama", "status": "active"},
                {"id": "agent-002", "name": "Data Analyst", "model": "mistral"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = live_client(server.url());
    let agents = client.get_agents().await.unwrap();

    mock.assert_async().await;
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0].id, "agent-001");
    assert_eq!(agents[1].name, "Data Analyst");
}

#[tokio::test]
#[serial]
async fn test_get_agents_bare_array_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/agents")
        .with_status(200)
        .with_body(r#"[{"id": "agent-001", "name": "Solo", "model": "llama3.2"}]"#)
        .create_async()
        .await;

    let client = live_client(server.url());
    let agents = client.get_agents().await.unwrap();

    mock.assert_async().await;
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].name, "Solo");
}

#[tokio::test]
#[serial]
async fn test_create_agent_posts_json_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/agents")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "name": "X",
            "model": "codellama",
            "capabilities": []
        })))
        .with_status(200)
        .with_body(
            r#"{"id": "agent-004", "name": "X", "model": "codellama", "status": "idle"}"#,
        )
        .create_async()
        .await;

    let client = live_client(server.url());
    let agent = client
        .create_agent(&NewAgent {
            name: "X".to_string(),
            model: "codellama".to_string(),
            capabilities: vec![],
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(agent.id, "agent-004");
    assert_eq!(agent.name, "X");
}

#[tokio::test]
#[serial]
async fn test_send_query_normalizes_full_response() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/query")
        .match_body(Matcher::Json(serde_json::json!({"query": "what is rust"})))
        .with_status(200)
        .with_body(
            r#"{
                "query": "what is rust",
                "orchestrator_response": "a systems language",
                "agents_responses": [
                    {"agent_id": "agent-001", "agent_name": "Code Analyzer",
                     "model": "codellama", "response": "memory safe", "response_time": 0.31}
                ],
                "final_response": "Rust is a memory-safe systems language",
                "reasoning": "merged two answers",
                "timestamp": "2024-01-01T00:00:00",
                "processing_time": 1.234
            }"#,
        )
        .create_async()
        .await;

    let client = live_client(server.url());
    let result = client.send_query("what is rust").await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.response, "Rust is a memory-safe systems language");
    assert_eq!(result.orchestrator_response, "a systems language");
    assert_eq!(result.agents_responses.len(), 1);
    assert_eq!(result.agents_responses[0].label(), "Code Analyzer");
    assert_eq!(result.processing_time, Some(1.234));
}

#[tokio::test]
#[serial]
async fn test_send_query_accepts_legacy_response_shape() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/query")
        .with_status(200)
        .with_body(r#"{"response": "old style answer"}"#)
        .create_async()
        .await;

    let client = live_client(server.url());
    let result = client.send_query("anything").await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.query, "anything");
    assert_eq!(result.response, "old style answer");
    assert_eq!(result.orchestrator_response, "old style answer");
}

#[tokio::test]
#[serial]
async fn test_retry_exhaustion_attempts_and_backoff() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/agents")
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let errors = Arc::new(Mutex::new(Vec::new()));
    let client = live_client(server.url());
    let errors_clone = Arc::clone(&errors);
    client.on_event(move |event| {
        if let ClientEvent::Error(message) = event {
            errors_clone.lock().unwrap().push(message.clone());
        }
    });

    let start = Instant::now();
    let err = client.get_agents().await.unwrap_err();
    let elapsed = start.elapsed();

    // All three attempts hit the server
    mock.assert_async().await;
    assert!(matches!(err, ClientError::Http { status: 500, .. }));
    // Linear backoff: 25ms after attempt 1, 50ms after attempt 2
    assert!(
        elapsed >= Duration::from_millis(75),
        "expected at least 75ms of backoff, got {elapsed:?}"
    );
    // Exhaustion surfaces through the error event channel too
    assert_eq!(errors.lock().unwrap().len(), 1);
    assert!(errors.lock().unwrap()[0].contains("500"));
}

#[tokio::test]
#[serial]
async fn test_http_error_carries_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/query")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let client = live_client(server.url());
    let err = client.send_query("q").await.unwrap_err();
    match err {
        ClientError::Http { status, reason } => {
            assert_eq!(status, 503);
            assert_eq!(reason, "Service Unavailable");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
#[serial]
async fn test_check_connection_reports_non_2xx_as_false() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(500)
        .expect(1) // health probe is single-shot, no retry
        .create_async()
        .await;

    let client = live_client(server.url());
    assert!(!client.check_connection().await);
    assert!(!client.is_connected());
    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_check_connection_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status": "healthy"}"#)
        .create_async()
        .await;

    let events = Arc::new(Mutex::new(Vec::new()));
    let client = live_client(server.url());
    let events_clone = Arc::clone(&events);
    client.on_event(move |event| {
        if let ClientEvent::ConnectionChange(connected) = event {
            events_clone.lock().unwrap().push(*connected);
        }
    });

    assert!(client.check_connection().await);
    assert!(client.is_connected());
    assert_eq!(*events.lock().unwrap(), vec![true]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unresponsive_server_times_out() {
    // A bound listener that never answers: the connection opens but the
    // request hangs until the per-attempt deadline fires.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let client = ApiClient::new(Config {
        base_url: format!("http://{addr}"),
        request_timeout: Duration::from_millis(100),
        retry_attempts: 1,
        retry_delay: Duration::from_millis(10),
        mock_mode: false,
    });

    let err = client.get_agents().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout));
    assert_eq!(err.to_string(), "Request timeout");
    drop(listener);
}
