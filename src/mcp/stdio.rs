//! stdio transport for the MCP server
//!
//! Messages are newline-delimited UTF-8 JSON-RPC. stdin carries client
//! messages, stdout carries responses only, and logging stays on stderr.

use std::io;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::mcp::rpc::json_rpc_error;
use crate::mcp::server::handle_json_rpc_payload;
use crate::AppState;

/// Serves MCP over the process stdin/stdout until stdin closes.
pub async fn serve_stdio(state: AppState) -> io::Result<()> {
    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve_lines(&state, reader, writer).await
}

/// Reads one JSON-RPC payload per line and writes one response line per answer.
pub async fn serve_lines<R, W>(state: &AppState, mut reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("mcp stdio transport ready");

    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            info!("stdin closed, shutting down");
            return Ok(());
        }

        let message = match std::str::from_utf8(&buffer) {
            Ok(line) => line.trim(),
            Err(err) => {
                debug!(error = %err, "stdio message is not valid utf-8");
                write_message(&mut writer, &json_rpc_error(None, -32700, "Parse error")).await?;
                continue;
            }
        };
        if message.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(message) {
            Ok(payload) => handle_json_rpc_payload(state, payload).await,
            Err(err) => {
                debug!(error = %err, "unparseable stdio message");
                Some(json_rpc_error(None, -32700, "Parse error"))
            }
        };

        if let Some(response) = response {
            write_message(&mut writer, &response).await?;
        }
    }
}

async fn write_message<W>(writer: &mut W, message: &Value) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    // serde_json's compact form never embeds newlines
    let json = serde_json::to_string(message)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
