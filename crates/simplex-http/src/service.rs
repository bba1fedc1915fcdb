//! Per-connection pipeline: one request in, one response out, then close.

use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::codec;
use crate::dispatch;
use crate::router::Router;

/// Serve one connection end to end.
///
/// A parse failure closes the connection without writing any response. The
/// socket never carries a second exchange, whatever protocol version the
/// request declared or whatever `Connection` header it sent.
pub async fn handle_connection<S>(mut stream: S, peer: SocketAddr, router: &Router)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // 1. Parse the single request off the socket.
    let request = match codec::read_request(&mut stream, peer).await {
        Ok(request) => request,
        Err(e) => {
            warn!(%peer, error = %e, "failed to parse request, closing connection");
            return;
        }
    };

    // 2. Resolve the route and run the handler.
    let response = dispatch::dispatch(router, &request);
    let status = response.status;

    // 3. Serialize with the request's own protocol version and write back.
    if let Err(e) = stream.write_all(&response.into_bytes(&request.version)).await {
        warn!(%peer, error = %e, "failed to write response");
        return;
    }

    debug!(%peer, method = %request.method, path = %request.path, status, "request served");

    // 4. Flush the write half before the socket drops.
    if let Err(e) = stream.shutdown().await {
        debug!(%peer, error = %e, "error shutting down connection");
    }
}
