//! Pluggable capability providers
//!
//! The engine consumes embeddings through the [`EmbeddingProvider`] trait;
//! the concrete adapter is chosen at startup so the core stays free of any
//! specific embedding-provider dependency.

pub mod embedding;
pub mod ollama;

#[cfg(test)]
pub mod stub;

pub use embedding::EmbeddingProvider;
pub use ollama::OllamaEmbedder;
