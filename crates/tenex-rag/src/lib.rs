//! tenex-rag: per-tenant document indexing and retrieval engine
//!
//! Ingests a corpus of text documents (one subdirectory per tenant), splits
//! them into overlapping chunks, embeds each chunk through a pluggable
//! embedding capability, and persists the result in a per-tenant vector index
//! built on tenex-core. Queries embed the question, run a cosine
//! nearest-neighbor search against the tenant's index, and return the ranked
//! chunk texts as one payload.
//!
//! The process boundary is a command loop: `{command, params}` in,
//! `{result}` out, exactly one result per command even on failure.

pub mod command;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod providers;
pub mod registry;
pub mod retrieval;
pub mod types;

pub use command::{CommandLoop, LoopState};
pub use config::KbConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, Document},
    protocol::{CommandParams, CommandRequest, CommandResponse},
};
