//! Orchestrator Client Library
//!
//! Headless core for a client of a multi-agent orchestration service.
//! Provides a retrying HTTP client ([`client::ApiClient`]) and a
//! publish/subscribe state container ([`store::StateStore`]) that a
//! presentation layer drives through `subscribe` plus operation calls.
//! A mock mode allows fully offline operation with synthetic data.

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod mock;
pub mod models;
/// Application state management
///
/// Holds the single source of truth for connection status, the agent
/// roster, selection, and loading/error flags.
pub mod store;
