//! Core index types

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for opening or creating an index
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Path to the SQLite index file
    pub path: PathBuf,
    /// Embedding dimensionality; every stored vector must match
    pub dimensions: usize,
}

/// An entry to be stored in the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorEntry {
    /// Caller-supplied identifier; a UUID is generated when absent
    pub id: Option<String>,
    /// Embedding vector
    pub vector: Vec<f32>,
    /// Arbitrary JSON metadata carried alongside the vector
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A similarity search request
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Query embedding
    pub vector: Vec<f32>,
    /// Maximum number of hits to return
    pub k: usize,
}

/// A single search hit
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Entry identifier
    pub id: String,
    /// Cosine similarity to the query (higher is more similar)
    pub score: f32,
    /// Metadata stored with the entry
    pub metadata: HashMap<String, serde_json::Value>,
}
