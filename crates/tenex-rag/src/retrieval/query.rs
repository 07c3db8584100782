//! Query answering over a tenant's index
//!
//! Every outcome is a string result: unknown tenants and embedder failures
//! produce soft, user-facing text rather than hard errors, so the command
//! loop always has something to answer with.

use crate::providers::EmbeddingProvider;
use crate::registry::IndexRegistry;

/// Soft answer for tenants with nothing to retrieve from
pub const NO_KNOWLEDGE: &str = "No knowledge available for this company";

/// Answers similarity-search queries against tenant indexes
pub struct QueryService {
    top_k: usize,
}

impl QueryService {
    /// Create a query service returning at most `top_k` chunks per answer
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Answer a query for one tenant.
    ///
    /// For a fixed index state and a fixed embedding the output is fully
    /// determined: chunks appear in ranked order, separated by a blank line.
    pub async fn answer(
        &self,
        registry: &mut IndexRegistry,
        embedder: &dyn EmbeddingProvider,
        tenant: &str,
        query: &str,
    ) -> String {
        if !registry.is_known(tenant) {
            tracing::debug!(tenant, "query for unknown tenant");
            return NO_KNOWLEDGE.to_string();
        }

        let store = match registry.resolve(tenant) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(tenant, error = %e, "failed to open tenant index");
                return format!("Error: {e}");
            }
        };

        match store.is_empty() {
            Ok(true) => return NO_KNOWLEDGE.to_string(),
            Ok(false) => {}
            Err(e) => return format!("Error: {e}"),
        }

        let embedding = match embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::warn!(tenant, error = %e, "query embedding failed");
                return format!("Error: {e}");
            }
        };

        let results = match store.search(&embedding, self.top_k) {
            Ok(results) => results,
            Err(e) => return format!("Error: {e}"),
        };

        results
            .iter()
            .map(|(chunk, _)| chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
