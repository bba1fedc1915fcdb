//! Listener binding and the accept loop.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use simplex_core::{ServerConfig, SimplexResult};
use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::router::Router;
use crate::service;

/// A bound server: the listener, the shared route registry, and the
/// admission semaphore bounding concurrent connections.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    permits: Arc<Semaphore>,
}

impl Server {
    /// Bind the configured address with `SO_REUSEADDR` and the configured
    /// listen backlog.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(config: &ServerConfig, router: Router) -> SimplexResult<Self> {
        let addr = config.socket_addr()?;
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(config.backlog)?;

        Ok(Self {
            listener,
            router: Arc::new(router),
            permits: Arc::new(Semaphore::new(config.max_connections)),
        })
    }

    /// The address the listener is bound to. Useful with port 0, where the
    /// OS picks the port.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until an accept-level failure.
    ///
    /// Each accepted connection is served on its own task and holds one
    /// admission permit for its whole lifetime; when the permits run out,
    /// accepting pauses instead of queueing unbounded work. Accept failures
    /// are returned to the caller; per-connection failures stay inside
    /// their task.
    pub async fn run(self) -> SimplexResult<()> {
        info!(addr = %self.listener.local_addr()?, "accepting connections");

        loop {
            let permit = Arc::clone(&self.permits)
                .acquire_owned()
                .await
                .expect("admission semaphore is never closed");

            let (stream, peer) = self.listener.accept().await?;
            debug!(%peer, "accepted connection");

            let router = Arc::clone(&self.router);
            tokio::spawn(async move {
                let _permit = permit;
                service::handle_connection(stream, peer, &router).await;
            });
        }
    }
}
