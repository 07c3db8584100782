//! Error types for the retrieval engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
///
/// Errors below per-tenant or per-command granularity are absorbed into the
/// command result text; only process-fatal conditions propagate out of the
/// command loop adapters.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (corpus or storage root missing or unreadable)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Per-tenant index open/write failure
    #[error("Storage error: {0}")]
    Storage(#[from] tenex_core::IndexError),

    /// Embedding generation failed for one unit of work
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Malformed or unknown command
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}
