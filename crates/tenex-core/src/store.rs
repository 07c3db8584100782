//! SQLite-backed vector index
//!
//! One index file per store. Vectors are persisted as little-endian f32
//! blobs, metadata as JSON text. Writes go through SQLite transactions, so a
//! failed batch rolls back and previously committed entries stay intact.

use std::collections::HashMap;

use parking_lot::Mutex;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::distance::cosine_similarity;
use crate::error::{IndexError, Result};
use crate::types::{IndexOptions, SearchHit, SearchQuery, VectorEntry};

/// On-disk vector index for one collection of embeddings
pub struct VectorIndex {
    conn: Mutex<Connection>,
    dimensions: usize,
}

impl VectorIndex {
    /// Open an index at the given path, creating it if absent.
    ///
    /// Idempotent: reopening an existing index verifies that its recorded
    /// dimensionality matches `options.dimensions` and fails with
    /// `DimensionMismatch` otherwise.
    pub fn open(options: IndexOptions) -> Result<Self> {
        if let Some(parent) = options.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::debug!(
            path = %options.path.display(),
            dimensions = options.dimensions,
            "opening vector index"
        );
        let conn = Connection::open(&options.path)?;
        let index = Self {
            conn: Mutex::new(conn),
            dimensions: options.dimensions,
        };

        index.migrate()?;
        Ok(index)
    }

    /// Create an in-memory index (for testing)
    #[cfg(test)]
    pub fn in_memory(dimensions: usize) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let index = Self {
            conn: Mutex::new(conn),
            dimensions,
        };

        index.migrate()?;
        Ok(index)
    }

    /// Create the schema and verify the recorded dimensionality
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS index_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Append-only entry log; rowid is the insertion order
            CREATE TABLE IF NOT EXISTS entries (
                id TEXT NOT NULL,
                vector BLOB NOT NULL,
                metadata TEXT NOT NULL
            );
            "#,
        )?;

        let recorded: Option<String> = conn
            .query_row(
                "SELECT value FROM index_meta WHERE key = 'dimensions'",
                [],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        match recorded {
            Some(value) => {
                let recorded: usize = value
                    .parse()
                    .map_err(|_| IndexError::corrupt(format!("bad dimensions record: {value}")))?;
                if recorded != self.dimensions {
                    return Err(IndexError::DimensionMismatch {
                        expected: recorded,
                        actual: self.dimensions,
                    });
                }
            }
            None => {
                conn.execute(
                    "INSERT INTO index_meta (key, value) VALUES ('dimensions', ?1)",
                    params![self.dimensions.to_string()],
                )?;
                tracing::debug!(dimensions = self.dimensions, "recorded index dimensionality");
            }
        }

        Ok(())
    }

    /// Embedding dimensionality of this index
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Append a single entry. Does not deduplicate.
    pub fn insert(&self, entry: VectorEntry) -> Result<()> {
        self.insert_batch(std::slice::from_ref(&entry))?;
        Ok(())
    }

    /// Append a batch of entries inside one transaction.
    ///
    /// Either every entry becomes durable or none does: the transaction rolls
    /// back on any validation or write failure, leaving the index in its
    /// prior committed state.
    pub fn insert_batch(&self, entries: &[VectorEntry]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        for entry in entries {
            if entry.vector.len() != self.dimensions {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: entry.vector.len(),
                });
            }

            let id = entry
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let metadata = serde_json::to_string(&entry.metadata)?;

            tx.execute(
                "INSERT INTO entries (id, vector, metadata) VALUES (?1, ?2, ?3)",
                params![id, encode_vector(&entry.vector), metadata],
            )?;
        }

        tx.commit()?;
        tracing::debug!(count = entries.len(), "entry batch committed");
        Ok(entries.len())
    }

    /// Search for the `k` entries most similar to the query vector.
    ///
    /// Results are ordered by descending cosine similarity; ties are broken
    /// by insertion order, earliest first. An empty index or `k == 0` yields
    /// an empty result, not an error.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        if query.k == 0 {
            return Ok(Vec::new());
        }
        if query.vector.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.vector.len(),
            });
        }

        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT rowid, id, vector, metadata FROM entries ORDER BY rowid")?;

        let mut scored: Vec<(i64, SearchHit)> = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let rowid: i64 = row.get(0)?;
            let id: String = row.get(1)?;
            let blob: Vec<u8> = row.get(2)?;
            let metadata_json: String = row.get(3)?;

            let vector = decode_vector(&blob)?;
            if vector.len() != self.dimensions {
                return Err(IndexError::corrupt(format!(
                    "entry {id} has {} dimensions, index expects {}",
                    vector.len(),
                    self.dimensions
                )));
            }

            let metadata: HashMap<String, serde_json::Value> =
                serde_json::from_str(&metadata_json)?;
            let score = cosine_similarity(&query.vector, &vector);

            scored.push((rowid, SearchHit { id, score, metadata }));
        }

        scored.sort_by(|a, b| b.1.score.total_cmp(&a.1.score).then(a.0.cmp(&b.0)));
        scored.truncate(query.k);

        Ok(scored.into_iter().map(|(_, hit)| hit).collect())
    }

    /// Number of stored entries
    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Check whether the index holds no entries
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Encode a vector as a little-endian f32 blob
fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(vector.len() * 4);
    for value in vector {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    blob
}

/// Decode a little-endian f32 blob back into a vector
fn decode_vector(blob: &[u8]) -> Result<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return Err(IndexError::corrupt(format!(
            "vector blob length {} is not a multiple of 4",
            blob.len()
        )));
    }

    Ok(blob
        .chunks_exact(4)
        .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .collect())
}
