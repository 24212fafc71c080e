use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{lookup_host, TcpListener, TcpSocket};
use tokio::sync::Semaphore;
use tracing::{info, Instrument};

use crate::config::{Config, ServeConfig, ServerConfig};
use crate::http::connection::Connection;

/// Pause after a failed accept (e.g. EMFILE) before accepting again.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Binds the listening socket with the configured backlog.
pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<TcpListener> {
    let listen_addr = cfg.listen_addr();
    let addr: SocketAddr = lookup_host(&listen_addr)
        .await
        .with_context(|| format!("failed to resolve {listen_addr}"))?
        .next()
        .with_context(|| format!("no address for {listen_addr}"))?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket
        .bind(addr)
        .with_context(|| format!("failed to bind {addr}"))?;

    Ok(socket.listen(cfg.backlog)?)
}

/// Accepts connections forever, one task per connection.
///
/// With `max_connections` set, accepting pauses while that many handlers are
/// active. Without it the number of handlers is unbounded.
pub async fn serve(
    listener: TcpListener,
    serve_cfg: Arc<ServeConfig>,
    max_connections: Option<usize>,
) -> anyhow::Result<()> {
    let limiter = max_connections.map(|n| Arc::new(Semaphore::new(n)));

    loop {
        let permit = match &limiter {
            Some(sem) => Some(sem.clone().acquire_owned().await?),
            None => None,
        };

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                accept_failed(&e).await;
                continue;
            }
        };
        tracing::debug!(%peer, "Accepted connection");

        let serve_cfg = serve_cfg.clone();
        let span = tracing::info_span!("conn", %peer);
        tokio::spawn(
            async move {
                let _permit = permit;
                let mut conn = Connection::new(socket, serve_cfg);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
            }
            .instrument(span),
        );
    }
}

async fn accept_failed(e: &std::io::Error) {
    tracing::warn!(error = %e, backoff = ?ACCEPT_BACKOFF, "Failed to accept connection");
    tokio::time::sleep(ACCEPT_BACKOFF).await;
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = bind(&cfg.server).await?;
    info!(
        addr = %listener.local_addr()?,
        root = %cfg.content.root.display(),
        max_connections = ?cfg.server.max_connections,
        "Listening"
    );

    serve(listener, cfg.serve_config(), cfg.server.max_connections).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn failed_accept_waits_before_retrying() {
        let e = std::io::Error::from_raw_os_error(24); // EMFILE
        let started = Instant::now();

        accept_failed(&e).await;

        assert!(started.elapsed() >= ACCEPT_BACKOFF);
    }
}
