//! tenex-core: on-disk vector index with cosine similarity search
//!
//! Stores fixed-dimension embedding vectors together with a JSON metadata map
//! in a single SQLite file and answers exact nearest-neighbor queries over
//! them. Entries are append-only; ranking ties are broken by insertion order.

pub mod distance;
pub mod error;
pub mod store;
pub mod types;

pub use distance::cosine_similarity;
pub use error::{IndexError, Result};
pub use store::VectorIndex;
pub use types::{IndexOptions, SearchHit, SearchQuery, VectorEntry};
