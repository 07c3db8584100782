//! Document and chunk types with provenance tracking

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document loaded from one tenant's corpus. Immutable once read.
#[derive(Debug, Clone)]
pub struct Document {
    /// Owning tenant
    pub tenant: String,
    /// Source path within the corpus
    pub path: PathBuf,
    /// Raw text
    pub text: String,
}

/// A chunk of text cut from a document; the unit of embedding and retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Owning tenant
    pub tenant: String,
    /// Text content
    pub content: String,
    /// Source document path (provenance)
    pub source_path: String,
    /// Character offset of the chunk start within the source document
    pub char_start: usize,
    /// Character offset just past the chunk end
    pub char_end: usize,
    /// Chunk index within the document
    pub chunk_index: u32,
    /// When the chunk was cut during ingestion
    pub created_at: DateTime<Utc>,
    /// Embedding vector; filled during ingestion
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Create a new chunk without an embedding
    pub fn new(
        tenant: String,
        content: String,
        source_path: String,
        char_start: usize,
        char_end: usize,
        chunk_index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant,
            content,
            source_path,
            char_start,
            char_end,
            chunk_index,
            created_at: Utc::now(),
            embedding: Vec::new(),
        }
    }

    /// Convert to index metadata for storage
    pub fn to_metadata(&self) -> HashMap<String, serde_json::Value> {
        let mut meta = HashMap::new();
        meta.insert("tenant".to_string(), serde_json::json!(self.tenant));
        meta.insert("content".to_string(), serde_json::json!(self.content));
        meta.insert(
            "source_path".to_string(),
            serde_json::json!(self.source_path),
        );
        meta.insert("char_start".to_string(), serde_json::json!(self.char_start));
        meta.insert("char_end".to_string(), serde_json::json!(self.char_end));
        meta.insert(
            "chunk_index".to_string(),
            serde_json::json!(self.chunk_index),
        );
        meta.insert(
            "created_at".to_string(),
            serde_json::json!(self.created_at.to_rfc3339()),
        );
        meta
    }

    /// Rebuild a chunk from stored index metadata.
    ///
    /// Lenient: missing fields fall back to defaults so one malformed entry
    /// degrades to an empty chunk instead of failing a whole query.
    pub fn from_metadata(
        id: &str,
        tenant: &str,
        metadata: &HashMap<String, serde_json::Value>,
    ) -> Self {
        let id = Uuid::parse_str(id).unwrap_or_else(|_| Uuid::new_v4());

        let content = metadata
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let source_path = metadata
            .get("source_path")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();

        let char_start = metadata
            .get("char_start")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as usize;

        let char_end = metadata
            .get("char_end")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as usize;

        let chunk_index = metadata
            .get("chunk_index")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;

        let created_at = metadata
            .get("created_at")
            .and_then(|v| v.as_str())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Self {
            id,
            tenant: tenant.to_string(),
            content,
            source_path,
            char_start,
            char_end,
            chunk_index,
            created_at,
            embedding: Vec::new(),
        }
    }
}
