//! Newline-delimited JSON-RPC over stdin/stdout

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

use super::handler::McpServer;
use super::protocol::{JsonRpcResponse, PARSE_ERROR};

/// Serve until stdin closes
pub async fn serve_stdio(server: &McpServer) -> anyhow::Result<()> {
    info!("MCP server listening on stdio");
    let reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();
    serve_lines(server, reader, &mut writer).await?;
    info!("stdin closed, shutting down");
    Ok(())
}

/// One message per line in, one response per line out. Blank lines are
/// skipped and notifications produce no output. A line that is not UTF-8 is
/// answered with a parse error.
pub async fn serve_lines<R, W>(server: &McpServer, mut reader: R, writer: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(raw_line) => {
                let line = raw_line.trim();
                if line.is_empty() {
                    continue;
                }
                server.handle_message(line).await
            }
            Err(e) => {
                warn!("received a line that is not valid UTF-8: {e}");
                Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("parse error: {e}"),
                ))
            }
        };
        let Some(response) = response else {
            continue;
        };

        let out = match serde_json::to_string(&response) {
            Ok(out) => out,
            Err(e) => {
                error!("failed to serialize response: {e}");
                continue;
            }
        };
        writer.write_all(out.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}
