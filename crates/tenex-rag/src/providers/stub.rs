//! Deterministic embedding stub for tests (no network)

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;

/// Letter-histogram embedder: 26 dimensions, one per ASCII letter.
///
/// Texts sharing letters score high cosine similarity, which is enough to
/// exercise ranking deterministically.
pub struct StubEmbedder {
    /// When true every call fails, for testing soft-failure paths
    pub fail: bool,
}

impl StubEmbedder {
    pub fn new() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(Error::embedding("stub embedder offline"));
        }

        let mut vector = vec![0.0f32; 26];
        for ch in text.chars() {
            let lower = ch.to_ascii_lowercase();
            if lower.is_ascii_lowercase() {
                vector[(lower as u8 - b'a') as usize] += 1.0;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        26
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.fail)
    }

    fn name(&self) -> &str {
        "stub"
    }
}
