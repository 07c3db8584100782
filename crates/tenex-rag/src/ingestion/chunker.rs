//! Text chunking into overlapping fixed-size windows

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};

/// A chunk of text with its character offsets in the source
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSpan {
    /// Chunk text
    pub text: String,
    /// Character offset of the first char within the source
    pub char_start: usize,
    /// Character offset just past the last char
    pub char_end: usize,
}

/// Sliding-window chunker with exact overlap.
///
/// The window unit is a word-boundary segment as produced by Unicode text
/// segmentation (words, whitespace runs, and punctuation each count as one
/// segment). Consecutive chunks overlap by exactly `overlap` segments, the
/// last chunk may be shorter than `chunk_size`, and concatenating the chunks
/// with the overlaps removed reconstructs the source text exactly.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a chunker. Requires `chunk_size > 0` and `chunk_size > overlap`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(Error::config(format!(
                "invalid chunking policy: size {chunk_size}, overlap {overlap}"
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Split text into overlapping chunks. Pure; empty input yields no chunks.
    pub fn split(&self, text: &str) -> Vec<ChunkSpan> {
        let segments: Vec<&str> = text.split_word_bounds().collect();
        if segments.is_empty() {
            return Vec::new();
        }

        // Character offset of each segment boundary
        let mut offsets = Vec::with_capacity(segments.len() + 1);
        offsets.push(0usize);
        for segment in &segments {
            let last = *offsets.last().unwrap_or(&0);
            offsets.push(last + segment.chars().count());
        }

        let step = self.chunk_size - self.overlap;
        let mut spans = Vec::new();
        let mut start = 0usize;

        loop {
            let end = (start + self.chunk_size).min(segments.len());
            spans.push(ChunkSpan {
                text: segments[start..end].concat(),
                char_start: offsets[start],
                char_end: offsets[end],
            });
            if end == segments.len() {
                break;
            }
            start += step;
        }

        spans
    }
}
