/// Plugin loop - newline-delimited JSON over a reader/writer pair
use crate::protocol::{ProviderResponse, handle_line};
use crate::provider::ProviderService;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Serves requests until `reader` reaches end of input
///
/// Each request runs on its own task so independent resources proceed in
/// parallel; responses are written in completion order, correlated by
/// `request_id`. Pending requests finish and their responses are written
/// before this returns, even when reading input fails.
pub async fn serve<P, R, W>(provider: Arc<P>, mut reader: R, writer: W) -> anyhow::Result<()>
where
    P: ProviderService + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<ProviderResponse>();
    let writer_task = tokio::spawn(write_responses(rx, writer));

    let mut tasks = JoinSet::new();
    let mut buf = Vec::new();
    let read_result = loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break Ok(()),
            Ok(_) => {}
            Err(e) => break Err(e),
        }

        let response_tx = tx.clone();
        let line = match String::from_utf8(std::mem::take(&mut buf)) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Dropping request that is not valid UTF-8");
                let response = ProviderResponse::malformed(format!(
                    "Request is not valid UTF-8: {}",
                    e.utf8_error()
                ));
                if response_tx.send(response).is_err() {
                    warn!("Response writer closed, dropping response");
                }
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let provider = Arc::clone(&provider);
        tasks.spawn(async move {
            let response = handle_line(provider.as_ref(), &line).await;
            if response_tx.send(response).is_err() {
                warn!("Response writer closed, dropping response");
            }
        });
    };

    // In-flight requests may already have reached the relay; their state must
    // still be written even when input failed
    if let Err(e) = &read_result {
        error!(error = %e, "Failed to read request input");
    }
    info!("Input closed, waiting for {} pending request(s)", tasks.len());
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "Request task failed");
        }
    }

    drop(tx);
    writer_task.await??;
    Ok(read_result?)
}

async fn write_responses<W>(
    mut rx: mpsc::UnboundedReceiver<ProviderResponse>,
    mut writer: W,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
        debug!(request_id = ?response.request_id, "Response written");
    }
    writer.shutdown().await?;
    Ok(())
}
