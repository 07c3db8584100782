//! Command protocol wire types
//!
//! One exchange per unit of work: `{command, params}` in, `{result}` out.
//! The response always carries a result string, even on failure; error text
//! is embedded in the result rather than sent on a separate channel.

use serde::{Deserialize, Serialize};

/// A command received across the process boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Command kind: "initialize" or "query"
    pub command: String,
    /// Command-specific parameters
    #[serde(default)]
    pub params: CommandParams,
}

impl CommandRequest {
    /// Build an initialize command
    pub fn initialize() -> Self {
        Self {
            command: "initialize".to_string(),
            params: CommandParams::default(),
        }
    }
}

/// Command parameters
///
/// The wire field is `company`: the original domain's word for tenant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandParams {
    /// Query text (for "query")
    #[serde(default)]
    pub query: Option<String>,
    /// Tenant identifier; the configured default applies when absent
    #[serde(default)]
    pub company: Option<String>,
}

/// The single response emitted for every command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Result payload or embedded error description
    pub result: String,
}
