//! Error types for the orchestrator client
//!
//! The network client retries transient failures internally; the final
//! error of an exhausted operation is surfaced both as the returned `Err`
//! and as an error event to any registered listener.

use thiserror::Error;

/// Errors surfaced by the network client
#[derive(Error, Debug)]
pub enum ClientError {
    /// The per-attempt deadline elapsed before a response arrived
    #[error("Request timeout")]
    Timeout,

    /// The service answered with a non-2xx status
    #[error("HTTP {status}: {reason}")]
    Http {
        /// Numeric status code of the response
        status: u16,
        /// Canonical reason phrase for the status
        reason: String,
    },

    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Build an HTTP error from a response status
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}
