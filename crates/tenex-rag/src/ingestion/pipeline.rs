//! Bulk ingestion pipeline
//!
//! Processes every discovered tenant independently: a tenant with no
//! documents is skipped, a tenant whose storage fails is reported, and a
//! chunk whose embedding fails is dropped. None of these abort the run;
//! only an unreadable corpus root does.

use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::ingestion::TextChunker;
use crate::providers::EmbeddingProvider;
use crate::registry::IndexRegistry;
use crate::types::{Chunk, Document};

/// Document file extensions admitted into the corpus
const TEXT_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Per-tenant ingestion outcome
#[derive(Debug, Clone)]
pub struct TenantIngest {
    /// Tenant identifier
    pub tenant: String,
    /// Documents loaded
    pub documents: usize,
    /// Chunks written to the index
    pub chunks: usize,
    /// Chunks dropped because embedding failed
    pub skipped_chunks: usize,
    /// Storage or IO failure that stopped this tenant, if any
    pub error: Option<String>,
}

/// Summary of one ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// One entry per discovered tenant, in processing order
    pub tenants: Vec<TenantIngest>,
}

impl IngestReport {
    /// Whether every discovered tenant was processed without error
    pub fn fully_successful(&self) -> bool {
        self.tenants.iter().all(|t| t.error.is_none())
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tenant in &self.tenants {
            if let Some(error) = &tenant.error {
                writeln!(f, "Failed to index {}: {}", tenant.tenant, error)?;
            } else if tenant.documents == 0 {
                writeln!(f, "No documents found for {}", tenant.tenant)?;
            } else {
                writeln!(
                    f,
                    "Initialized vector store for {} with {} chunks",
                    tenant.tenant, tenant.chunks
                )?;
            }
        }
        if self.fully_successful() {
            write!(f, "Vector store initialized successfully")?;
        } else {
            write!(f, "Vector store initialized with errors")?;
        }
        Ok(())
    }
}

/// Orchestrates corpus discovery, chunking, embedding, and index writes
pub struct IngestionPipeline {
    corpus_root: PathBuf,
    chunker: TextChunker,
}

impl IngestionPipeline {
    /// Create a pipeline with the fixed configured chunking policy
    pub fn new(corpus_root: PathBuf, chunking: &ChunkingConfig) -> Result<Self> {
        Ok(Self {
            corpus_root,
            chunker: TextChunker::new(chunking.chunk_size, chunking.chunk_overlap)?,
        })
    }

    /// Ingest every tenant discovered under the corpus root.
    ///
    /// Fails only when the corpus root itself is unreadable; per-tenant
    /// failures are captured in the report.
    pub async fn initialize_all(
        &self,
        registry: &mut IndexRegistry,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<IngestReport> {
        let tenants = registry.list_known_tenants(&self.corpus_root)?;
        tracing::info!(count = tenants.len(), "discovered tenant corpora");

        let mut report = IngestReport::default();
        for tenant in tenants {
            let outcome = match self.ingest_tenant(registry, embedder, &tenant).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(tenant, error = %e, "tenant ingestion failed");
                    TenantIngest {
                        tenant: tenant.clone(),
                        documents: 0,
                        chunks: 0,
                        skipped_chunks: 0,
                        error: Some(e.to_string()),
                    }
                }
            };
            report.tenants.push(outcome);
        }

        Ok(report)
    }

    /// Ingest one tenant's corpus into its index
    async fn ingest_tenant(
        &self,
        registry: &mut IndexRegistry,
        embedder: &dyn EmbeddingProvider,
        tenant: &str,
    ) -> Result<TenantIngest> {
        let documents = self.load_documents(tenant);
        if documents.is_empty() {
            tracing::info!(tenant, "no documents found, skipping");
            return Ok(TenantIngest {
                tenant: tenant.to_string(),
                documents: 0,
                chunks: 0,
                skipped_chunks: 0,
                error: None,
            });
        }

        let mut embedded = Vec::new();
        let mut skipped = 0usize;

        for document in &documents {
            let source_path = document.path.to_string_lossy().into_owned();
            for (index, span) in self.chunker.split(&document.text).into_iter().enumerate() {
                let mut chunk = Chunk::new(
                    tenant.to_string(),
                    span.text,
                    source_path.clone(),
                    span.char_start,
                    span.char_end,
                    index as u32,
                );

                match embedder.embed(&chunk.content).await {
                    Ok(embedding) => {
                        chunk.embedding = embedding;
                        embedded.push(chunk);
                    }
                    Err(e) => {
                        tracing::warn!(
                            tenant,
                            source = %source_path,
                            chunk_index = index,
                            error = %e,
                            "embedding failed, skipping chunk"
                        );
                        skipped += 1;
                    }
                }
            }
        }

        let store = registry.resolve(tenant)?;
        store.add_batch(&embedded)?;
        tracing::info!(tenant, chunks = embedded.len(), skipped, "tenant indexed");

        Ok(TenantIngest {
            tenant: tenant.to_string(),
            documents: documents.len(),
            chunks: embedded.len(),
            skipped_chunks: skipped,
            error: None,
        })
    }

    /// Load a tenant's parseable documents in a deterministic order.
    ///
    /// Non-text files are skipped; an unreadable file is logged and skipped
    /// rather than failing the tenant.
    fn load_documents(&self, tenant: &str) -> Vec<Document> {
        let tenant_dir = self.corpus_root.join(tenant);
        let mut documents = Vec::new();

        for entry in WalkDir::new(&tenant_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_text_document(path) {
                continue;
            }

            match std::fs::read_to_string(path) {
                Ok(text) => documents.push(Document {
                    tenant: tenant.to_string(),
                    path: path.to_path_buf(),
                    text,
                }),
                Err(e) => {
                    tracing::warn!(tenant, path = %path.display(), error = %e, "unreadable document, skipping");
                }
            }
        }

        documents
    }
}

/// Check whether a path carries an admitted text-document extension
fn is_text_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEXT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::stub::StubEmbedder;

    fn write_doc(corpus: &Path, tenant: &str, name: &str, text: &str) {
        let dir = corpus.join(tenant);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), text).unwrap();
    }

    #[tokio::test]
    async fn test_initialize_all_indexes_every_tenant() {
        let corpus = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        write_doc(corpus.path(), "acme", "notes.md", "Alpha Bravo Charlie Delta");
        write_doc(corpus.path(), "globex", "intro.txt", "Echo Foxtrot Golf");

        let pipeline = IngestionPipeline::new(
            corpus.path().to_path_buf(),
            &ChunkingConfig {
                chunk_size: 10,
                chunk_overlap: 2,
            },
        )
        .unwrap();

        let mut registry = IndexRegistry::new(storage.path().to_path_buf(), 26);
        let report = pipeline
            .initialize_all(&mut registry, &StubEmbedder::new())
            .await
            .unwrap();

        assert_eq!(report.tenants.len(), 2);
        assert!(report.fully_successful());
        assert!(report.tenants.iter().all(|t| t.chunks >= 1));
        assert!(registry.resolve("acme").unwrap().len().unwrap() >= 1);
        assert!(registry.resolve("globex").unwrap().len().unwrap() >= 1);

        let summary = report.to_string();
        assert!(summary.contains("Initialized vector store for acme"));
        assert!(summary.ends_with("Vector store initialized successfully"));
    }

    #[tokio::test]
    async fn test_tenant_without_documents_is_skipped() {
        let corpus = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        std::fs::create_dir(corpus.path().join("empty")).unwrap();
        write_doc(corpus.path(), "acme", "notes.md", "Alpha Bravo");
        // Non-text files are ignored during enumeration
        write_doc(corpus.path(), "acme", "binary.bin", "not text");

        let pipeline =
            IngestionPipeline::new(corpus.path().to_path_buf(), &ChunkingConfig::default())
                .unwrap();
        let mut registry = IndexRegistry::new(storage.path().to_path_buf(), 26);
        let report = pipeline
            .initialize_all(&mut registry, &StubEmbedder::new())
            .await
            .unwrap();

        let empty = report.tenants.iter().find(|t| t.tenant == "empty").unwrap();
        assert_eq!(empty.documents, 0);
        assert_eq!(empty.chunks, 0);
        assert!(empty.error.is_none());

        let acme = report.tenants.iter().find(|t| t.tenant == "acme").unwrap();
        assert_eq!(acme.documents, 1);
        assert!(report.to_string().contains("No documents found for empty"));
    }

    #[tokio::test]
    async fn test_embedding_failures_skip_chunks_not_tenants() {
        let corpus = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        write_doc(corpus.path(), "acme", "notes.md", "Alpha Bravo");

        let pipeline =
            IngestionPipeline::new(corpus.path().to_path_buf(), &ChunkingConfig::default())
                .unwrap();
        let mut registry = IndexRegistry::new(storage.path().to_path_buf(), 26);
        let report = pipeline
            .initialize_all(&mut registry, &StubEmbedder::failing())
            .await
            .unwrap();

        let acme = &report.tenants[0];
        assert!(acme.error.is_none());
        assert_eq!(acme.chunks, 0);
        assert!(acme.skipped_chunks >= 1);
        assert!(registry.resolve("acme").unwrap().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_unreadable_corpus_root_is_fatal() {
        let storage = tempfile::tempdir().unwrap();
        let pipeline = IngestionPipeline::new(
            PathBuf::from("/nonexistent/corpus"),
            &ChunkingConfig::default(),
        )
        .unwrap();
        let mut registry = IndexRegistry::new(storage.path().to_path_buf(), 26);

        let result = pipeline
            .initialize_all(&mut registry, &StubEmbedder::new())
            .await;
        assert!(matches!(result, Err(crate::error::Error::Config(_))));
    }
}
