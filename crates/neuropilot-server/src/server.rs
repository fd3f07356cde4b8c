//! Accept loop: one task per connection, one request per connection.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use neuropilot_observability::http_request_span;

use crate::http::{read_request, HttpError, Response};
use crate::routes;
use crate::runtime::NeuropilotRuntime;

/// Unread request bytes discarded after a rejection, so the client sees
/// the response instead of a reset.
const MAX_DRAIN_BYTES: u64 = 256 * 1024;
const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Bind the listener for `addr`.
pub async fn bind(addr: &str) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    Ok(listener)
}

/// Serve connections until the listener fails.
pub async fn serve(runtime: Arc<NeuropilotRuntime>, listener: TcpListener) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        debug!(%peer, "connection accepted");
        tokio::spawn(handle_connection(Arc::clone(&runtime), stream));
    }
}

async fn handle_connection(runtime: Arc<NeuropilotRuntime>, stream: TcpStream) {
    let max_body_bytes = runtime.config.server.max_body_bytes;
    let read_timeout_secs = runtime.config.server.read_timeout_secs;
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let read = tokio::time::timeout(
        Duration::from_secs(read_timeout_secs),
        read_request(&mut reader, max_body_bytes),
    )
    .await
    .unwrap_or(Err(HttpError::TimedOut {
        secs: read_timeout_secs,
    }));

    let mut drain_after_write = false;
    let response = match read {
        Ok(request) => {
            let span = http_request_span!(Uuid::new_v4(), request.method, request.path);
            async {
                let response = routes::handle(runtime, request).await;
                debug!(status = response.status, "request handled");
                response
            }
            .instrument(span)
            .await
        }
        Err(e) => match e.status() {
            Some(status) => {
                warn!(error = %e, status, "rejecting request");
                drain_after_write = !matches!(e, HttpError::TimedOut { .. });
                Response::error(status, e.to_string())
            }
            None => {
                debug!(error = %e, "connection dropped");
                return;
            }
        },
    };

    if let Err(e) = write_half.write_all(&response.to_bytes()).await {
        debug!(error = %e, "failed to write response");
        return;
    }
    let _ = write_half.shutdown().await;
    if drain_after_write {
        drain(&mut reader).await;
    }
}

/// Discard what the client is still sending, bounded in bytes and time.
async fn drain<R>(reader: &mut R)
where
    R: AsyncRead + Unpin,
{
    let mut limited = (&mut *reader).take(MAX_DRAIN_BYTES);
    let mut sink = tokio::io::sink();
    match tokio::time::timeout(DRAIN_TIMEOUT, tokio::io::copy(&mut limited, &mut sink)).await {
        Ok(Ok(bytes)) => debug!(bytes, "drained rejected request"),
        Ok(Err(e)) => debug!(error = %e, "drain failed"),
        Err(_) => debug!("drain timed out"),
    }
}
