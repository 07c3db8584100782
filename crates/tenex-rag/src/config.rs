//! Configuration for the indexing and retrieval engine

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KbConfig {
    /// Filesystem roots
    #[serde(default)]
    pub paths: PathsConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Embedding endpoint configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,
}

impl KbConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::config(format!(
                "cannot read config file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        toml::from_str(&raw).map_err(|e| Error::config(format!("invalid config: {e}")))
    }
}

/// Filesystem layout: corpus in, indexes and command exchanges out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Corpus root; one subdirectory per tenant holding its text documents
    pub corpus_root: PathBuf,
    /// Storage root; one subdirectory per tenant holding its vector index
    pub storage_root: PathBuf,
    /// Directory for one-shot request/response file exchanges
    pub exchange_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            corpus_root: PathBuf::from("data/knowledge_base"),
            storage_root: PathBuf::from("data/vector_db"),
            exchange_dir: PathBuf::from("."),
        }
    }
}

/// Text chunking configuration
///
/// Window size and overlap are configuration constants for the whole run,
/// not per-call parameters. Units are word-boundary segments, see
/// [`crate::ingestion::TextChunker`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Chunk window size in segments
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in segments
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

/// Embedding endpoint configuration (Ollama-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding service base URL
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            timeout_secs: 120,
        }
    }
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Number of nearest chunks returned per query
    pub top_k: usize,
    /// Tenant assumed when a query names none
    pub default_tenant: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            default_tenant: "facebook".to_string(),
        }
    }
}
