//! Resident stdin mode
//!
//! The process ingests the corpus once at startup, then serves commands as
//! JSON lines on stdin, one JSON response per line on stdout, until "exit"
//! or end of input.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::command::CommandLoop;
use crate::error::{Error, Result};
use crate::types::{CommandRequest, CommandResponse};

/// Serve commands over stdin/stdout until "exit" or EOF
pub async fn run_resident(command_loop: &mut CommandLoop) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve_lines(command_loop, stdin, stdout).await
}

/// Line-oriented command server over arbitrary streams
async fn serve_lines<R, W>(
    command_loop: &mut CommandLoop,
    reader: R,
    mut writer: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    // Corpus ingestion happens once, before any command is accepted
    let startup = command_loop
        .dispatch(CommandRequest::initialize())
        .await;
    tracing::info!(result = %startup.result, "startup ingestion complete");

    let mut lines = reader.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| Error::protocol(format!("stdin read failed: {e}")))?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" {
            break;
        }

        let response = match serde_json::from_str::<CommandRequest>(line) {
            Ok(request) => command_loop.dispatch(request).await,
            Err(e) => {
                tracing::warn!(error = %e, "malformed command line");
                CommandResponse {
                    result: format!("Error processing request: {e}"),
                }
            }
        };

        let body = serde_json::to_string(&response)?;
        writer
            .write_all(body.as_bytes())
            .await
            .map_err(|e| Error::protocol(format!("stdout write failed: {e}")))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| Error::protocol(format!("stdout write failed: {e}")))?;
        writer
            .flush()
            .await
            .map_err(|e| Error::protocol(format!("stdout flush failed: {e}")))?;
    }

    command_loop.stop();
    tracing::info!("command loop stopped");
    Ok(())
}
