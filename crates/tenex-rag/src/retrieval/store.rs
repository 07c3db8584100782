//! Per-tenant vector store
//!
//! Wraps one tenex-core index per tenant. The on-disk location is addressed
//! solely by the tenant identifier, so no cross-tenant data is ever visible
//! through one handle.

use std::path::{Path, PathBuf};

use tenex_core::{IndexOptions, SearchQuery, VectorEntry, VectorIndex};

use crate::error::Result;
use crate::types::Chunk;

/// Durable storage and nearest-neighbor retrieval for one tenant
pub struct TenantStore {
    tenant: String,
    index: VectorIndex,
}

impl TenantStore {
    /// Open a tenant's index, creating the on-disk structure if absent.
    /// Idempotent; fails if the location exists but is corrupt or unreadable.
    pub fn open_or_create(storage_root: &Path, tenant: &str, dimensions: usize) -> Result<Self> {
        let index = VectorIndex::open(IndexOptions {
            path: Self::index_path(storage_root, tenant),
            dimensions,
        })?;

        Ok(Self {
            tenant: tenant.to_string(),
            index,
        })
    }

    /// On-disk index location for a tenant
    pub fn index_path(storage_root: &Path, tenant: &str) -> PathBuf {
        storage_root.join(tenant).join("index.db")
    }

    /// Tenant this store belongs to
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Append one chunk with its embedding. Does not deduplicate.
    pub fn add(&self, chunk: &Chunk) -> Result<()> {
        self.add_batch(std::slice::from_ref(chunk))?;
        Ok(())
    }

    /// Append a batch of embedded chunks in one transaction.
    ///
    /// A failure leaves the index in its prior durable state; no partial
    /// batch is ever visible.
    pub fn add_batch(&self, chunks: &[Chunk]) -> Result<usize> {
        let entries: Vec<VectorEntry> = chunks
            .iter()
            .map(|chunk| VectorEntry {
                id: Some(chunk.id.to_string()),
                vector: chunk.embedding.clone(),
                metadata: chunk.to_metadata(),
            })
            .collect();

        Ok(self.index.insert_batch(&entries)?)
    }

    /// Return at most `k` chunks ranked by descending cosine similarity,
    /// ties broken by insertion order. Empty index yields an empty result.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<(Chunk, f32)>> {
        let hits = self.index.search(&SearchQuery {
            vector: query_embedding.to_vec(),
            k,
        })?;

        Ok(hits
            .into_iter()
            .map(|hit| {
                let chunk = Chunk::from_metadata(&hit.id, &self.tenant, &hit.metadata);
                (chunk, hit.score)
            })
            .collect())
    }

    /// Number of stored chunks
    pub fn len(&self) -> Result<usize> {
        Ok(self.index.len()?)
    }

    /// Check whether the tenant has any ingested chunks
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.index.is_empty()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded_chunk(tenant: &str, content: &str, embedding: Vec<f32>, index: u32) -> Chunk {
        let mut chunk = Chunk::new(
            tenant.to_string(),
            content.to_string(),
            "doc.md".to_string(),
            0,
            content.chars().count(),
            index,
        );
        chunk.embedding = embedding;
        chunk
    }

    #[test]
    fn test_store_and_search_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TenantStore::open_or_create(dir.path(), "acme", 2).unwrap();

        store
            .add_batch(&[
                embedded_chunk("acme", "first", vec![1.0, 0.0], 0),
                embedded_chunk("acme", "second", vec![0.0, 1.0], 1),
            ])
            .unwrap();

        let results = store.search(&[1.0, 0.2], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.content, "first");
        assert_eq!(results[0].0.tenant, "acme");
        assert_eq!(results[0].0.source_path, "doc.md");
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = TenantStore::open_or_create(dir.path(), "acme", 2).unwrap();
            store
                .add(&embedded_chunk("acme", "persisted", vec![1.0, 0.0], 0))
                .unwrap();
        }

        let reopened = TenantStore::open_or_create(dir.path(), "acme", 2).unwrap();
        assert_eq!(reopened.len().unwrap(), 1);
    }

    #[test]
    fn test_tenants_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let acme = TenantStore::open_or_create(dir.path(), "acme", 2).unwrap();
        let globex = TenantStore::open_or_create(dir.path(), "globex", 2).unwrap();

        acme.add(&embedded_chunk("acme", "acme only", vec![1.0, 0.0], 0))
            .unwrap();

        assert!(globex.is_empty().unwrap());
        assert!(globex.search(&[1.0, 0.0], 3).unwrap().is_empty());
    }
}
