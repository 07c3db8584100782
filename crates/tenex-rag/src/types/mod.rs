//! Engine data types

pub mod document;
pub mod protocol;

pub use document::{Chunk, Document};
pub use protocol::{CommandParams, CommandRequest, CommandResponse};
