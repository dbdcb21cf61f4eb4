use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::error::{Result, StandardBotsError};
use crate::mcp::{JsonRpcResponse, McpServer};

/// Serve newline-delimited JSON-RPC on the process's stdin/stdout.
pub async fn serve(server: McpServer) -> Result<()> {
    tracing::info!("Serving MCP over stdio");
    serve_lines(server, tokio::io::stdin(), tokio::io::stdout()).await
}

/// One message per line in, one response per line out. Requests run
/// concurrently; a single writer keeps output lines whole. Returns on EOF
/// once every in-flight request has answered. Bytes that are not UTF-8 are
/// decoded lossily and answered with a parse error.
pub async fn serve_lines<R, W>(server: McpServer, reader: R, writer: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(response) = rx.recv().await {
            let mut line = serde_json::to_string(&response)?;
            line.push('\n');
            writer.write_all(line.as_bytes()).await?;
            writer.flush().await?;
        }
        Ok::<(), StandardBotsError>(())
    });

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut in_flight = JoinSet::new();
    let mut read_error = None;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                read_error = Some(e);
                break;
            }
        }

        // Invalid UTF-8 becomes a parse error for that line only
        let line = String::from_utf8_lossy(&buf).into_owned();
        if line.trim().is_empty() {
            continue;
        }

        let server = server.clone();
        let tx = tx.clone();
        in_flight.spawn(async move {
            if let Some(response) = server.handle_message(&line).await {
                // Receiver only goes away if the writer failed
                let _ = tx.send(response);
            }
        });
    }

    tracing::debug!("stdin closed, draining {} request(s)", in_flight.len());
    while in_flight.join_next().await.is_some() {}
    drop(tx);

    writer_task
        .await
        .map_err(|e| StandardBotsError::Other(format!("stdio writer task failed: {}", e)))??;

    // Pending requests were still answered before surfacing a broken stdin
    match read_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
