//! One-shot file-exchange mode
//!
//! A caller drops `request_{id}.json` into the exchange directory, the
//! process answers with `response_{id}.json`, and exits. A response file is
//! written even when the request is missing or malformed.

use std::path::Path;

use crate::command::CommandLoop;
use crate::error::{Error, Result};
use crate::types::{CommandRequest, CommandResponse};

/// Serve exactly one file-exchange request, returning the process exit code.
///
/// A missing request file is the only outcome with a nonzero code; every
/// other failure is reported inside the response file.
pub async fn run_one_shot(
    command_loop: &mut CommandLoop,
    exchange_dir: &Path,
    request_id: &str,
) -> Result<i32> {
    let request_path = exchange_dir.join(format!("request_{request_id}.json"));
    let response_path = exchange_dir.join(format!("response_{request_id}.json"));

    let raw = match std::fs::read_to_string(&request_path) {
        Ok(raw) => raw,
        Err(_) => {
            tracing::error!(path = %request_path.display(), "request file not found");
            let response = CommandResponse {
                result: format!("Error: Request file request_{request_id}.json not found"),
            };
            write_response(&response_path, &response)?;
            return Ok(1);
        }
    };

    let response = match serde_json::from_str::<CommandRequest>(&raw) {
        Ok(request) => command_loop.dispatch(request).await,
        Err(e) => {
            tracing::warn!(path = %request_path.display(), error = %e, "malformed request");
            CommandResponse {
                result: format!("Error processing request: {e}"),
            }
        }
    };

    write_response(&response_path, &response)?;
    command_loop.stop();
    Ok(0)
}

fn write_response(path: &Path, response: &CommandResponse) -> Result<()> {
    let body = serde_json::to_string_pretty(response)?;
    std::fs::write(path, body)
        .map_err(|e| Error::protocol(format!("cannot write response {}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "response written");
    Ok(())
}
