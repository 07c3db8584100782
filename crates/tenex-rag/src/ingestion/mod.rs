//! Corpus ingestion: discover, load, chunk, embed, persist

pub mod chunker;
pub mod pipeline;

pub use chunker::{ChunkSpan, TextChunker};
pub use pipeline::{IngestReport, IngestionPipeline, TenantIngest};
