//! tenex-kb: per-tenant knowledge base engine
//!
//! With a request id argument the process serves exactly one file-exchange
//! request and exits; without one it ingests the corpus and serves commands
//! on stdin until "exit".

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tenex_rag::command::{run_one_shot, run_resident, CommandLoop};
use tenex_rag::providers::{EmbeddingProvider, OllamaEmbedder};
use tenex_rag::KbConfig;

const CONFIG_ENV: &str = "TENEX_KB_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tenex_rag=info,tenex_core=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => KbConfig::load(&path).with_context(|| format!("loading config {path}"))?,
        Err(_) => KbConfig::default(),
    };

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbedder::new(&config.embeddings));
    match embedder.health_check().await {
        Ok(true) => tracing::info!(provider = embedder.name(), "embedding endpoint reachable"),
        _ => tracing::warn!(
            provider = embedder.name(),
            url = %config.embeddings.base_url,
            "embedding endpoint unreachable, commands will answer with errors"
        ),
    }

    let mut command_loop =
        CommandLoop::new(&config, embedder).context("assembling command loop")?;

    match std::env::args().nth(1) {
        Some(request_id) => {
            let code = run_one_shot(&mut command_loop, &config.paths.exchange_dir, &request_id)
                .await
                .context("serving one-shot request")?;
            Ok(ExitCode::from(code as u8))
        }
        None => {
            run_resident(&mut command_loop)
                .await
                .context("serving resident command loop")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
