//! Command loop: the single entry point for driving the engine
//!
//! Every command produces exactly one response. Failures of individual
//! commands are folded into the response text; only startup configuration
//! problems abort the process.

pub mod oneshot;
pub mod resident;

use std::sync::Arc;

use crate::config::KbConfig;
use crate::error::Result;
use crate::ingestion::IngestionPipeline;
use crate::providers::EmbeddingProvider;
use crate::registry::IndexRegistry;
use crate::retrieval::QueryService;
use crate::types::{CommandRequest, CommandResponse};

pub use oneshot::run_one_shot;
pub use resident::run_resident;

/// Lifecycle of the command loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for a command
    Idle,
    /// A command is being processed
    Dispatching,
    /// The loop has been stopped and accepts no further commands
    Stopped,
}

/// Owns the registry, pipeline, and query service, and dispatches commands
/// against them one at a time
pub struct CommandLoop {
    registry: IndexRegistry,
    pipeline: IngestionPipeline,
    query: QueryService,
    embedder: Arc<dyn EmbeddingProvider>,
    default_tenant: String,
    state: LoopState,
}

impl CommandLoop {
    /// Assemble the engine from configuration and an embedding capability
    pub fn new(config: &KbConfig, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let registry = IndexRegistry::new(
            config.paths.storage_root.clone(),
            embedder.dimensions(),
        );
        let pipeline =
            IngestionPipeline::new(config.paths.corpus_root.clone(), &config.chunking)?;

        Ok(Self {
            registry,
            pipeline,
            query: QueryService::new(config.query.top_k),
            embedder,
            default_tenant: config.query.default_tenant.clone(),
            state: LoopState::Idle,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Stop the loop. Idempotent.
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    /// Dispatch one command and produce its single response.
    ///
    /// An unrecognized command name, an ingestion failure, or a query
    /// failure all still yield a response; the loop stays alive.
    pub async fn dispatch(&mut self, request: CommandRequest) -> CommandResponse {
        self.state = LoopState::Dispatching;
        tracing::info!(command = %request.command, "dispatching command");

        let result = match request.command.as_str() {
            "initialize" => self.handle_initialize().await,
            "query" => self.handle_query(&request).await,
            other => format!("Unknown command: {other}"),
        };

        self.state = LoopState::Idle;
        CommandResponse { result }
    }

    async fn handle_initialize(&mut self) -> String {
        match self
            .pipeline
            .initialize_all(&mut self.registry, self.embedder.as_ref())
            .await
        {
            Ok(report) => report.to_string(),
            Err(e) => format!("Error: {e}"),
        }
    }

    async fn handle_query(&mut self, request: &CommandRequest) -> String {
        let tenant = request
            .params
            .company
            .as_deref()
            .unwrap_or(&self.default_tenant);
        let query = request.params.query.as_deref().unwrap_or_default();

        self.query
            .answer(
                &mut self.registry,
                self.embedder.as_ref(),
                tenant,
                query,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChunkingConfig, PathsConfig, QueryConfig};
    use crate::providers::stub::StubEmbedder;
    use crate::types::CommandParams;

    fn test_config(corpus: &std::path::Path, storage: &std::path::Path) -> KbConfig {
        KbConfig {
            paths: PathsConfig {
                corpus_root: corpus.to_path_buf(),
                storage_root: storage.to_path_buf(),
                exchange_dir: storage.to_path_buf(),
            },
            chunking: ChunkingConfig {
                chunk_size: 10,
                chunk_overlap: 2,
            },
            query: QueryConfig {
                top_k: 3,
                default_tenant: "acme".to_string(),
            },
            ..KbConfig::default()
        }
    }

    #[tokio::test]
    async fn test_unknown_command_keeps_loop_alive() {
        let corpus = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let mut command_loop =
            CommandLoop::new(&test_config(corpus.path(), storage.path()), Arc::new(StubEmbedder::new()))
                .unwrap();

        let response = command_loop
            .dispatch(CommandRequest {
                command: "reindex".to_string(),
                params: CommandParams::default(),
            })
            .await;

        assert_eq!(response.result, "Unknown command: reindex");
        assert_eq!(command_loop.state(), LoopState::Idle);

        // Still dispatches after the unknown command
        let response = command_loop.dispatch(CommandRequest::initialize()).await;
        assert!(response.result.contains("Vector store initialized"));
    }

    #[tokio::test]
    async fn test_initialize_then_query_end_to_end() {
        let corpus = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let acme = corpus.path().join("acme");
        std::fs::create_dir_all(&acme).unwrap();
        std::fs::write(acme.join("doc.md"), "Alpha Bravo Charlie Delta").unwrap();

        let mut command_loop =
            CommandLoop::new(&test_config(corpus.path(), storage.path()), Arc::new(StubEmbedder::new()))
                .unwrap();

        let response = command_loop.dispatch(CommandRequest::initialize()).await;
        assert!(response.result.contains("Initialized vector store for acme"));
        assert!(response
            .result
            .ends_with("Vector store initialized successfully"));

        let response = command_loop
            .dispatch(CommandRequest {
                command: "query".to_string(),
                params: CommandParams {
                    query: Some("Alpha Bravo".to_string()),
                    company: Some("acme".to_string()),
                },
            })
            .await;
        assert!(
            response.result.contains("Alpha Bravo"),
            "got: {}",
            response.result
        );
    }

    #[tokio::test]
    async fn test_query_defaults_to_configured_tenant() {
        let corpus = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let acme = corpus.path().join("acme");
        std::fs::create_dir_all(&acme).unwrap();
        std::fs::write(acme.join("doc.md"), "Alpha Bravo").unwrap();

        let mut command_loop =
            CommandLoop::new(&test_config(corpus.path(), storage.path()), Arc::new(StubEmbedder::new()))
                .unwrap();
        command_loop.dispatch(CommandRequest::initialize()).await;

        // No company in params, default_tenant is "acme"
        let response = command_loop
            .dispatch(CommandRequest {
                command: "query".to_string(),
                params: CommandParams {
                    query: Some("Alpha".to_string()),
                    company: None,
                },
            })
            .await;
        assert!(response.result.contains("Alpha"));
    }

    #[tokio::test]
    async fn test_query_for_unknown_tenant_is_soft() {
        let corpus = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let mut command_loop =
            CommandLoop::new(&test_config(corpus.path(), storage.path()), Arc::new(StubEmbedder::new()))
                .unwrap();

        let response = command_loop
            .dispatch(CommandRequest {
                command: "query".to_string(),
                params: CommandParams {
                    query: Some("anything".to_string()),
                    company: Some("nowhere".to_string()),
                },
            })
            .await;
        assert_eq!(
            response.result,
            crate::retrieval::NO_KNOWLEDGE
        );
    }

    #[tokio::test]
    async fn test_stop_is_terminal() {
        let corpus = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let mut command_loop =
            CommandLoop::new(&test_config(corpus.path(), storage.path()), Arc::new(StubEmbedder::new()))
                .unwrap();

        command_loop.stop();
        assert_eq!(command_loop.state(), LoopState::Stopped);
        command_loop.stop();
        assert_eq!(command_loop.state(), LoopState::Stopped);
    }
}
