//! Connection lifecycle: request loop and shutdown tracking.
//!
//! # Responsibilities
//! - Drive one connection: read request, dispatch to the router, write response
//! - Generate unique connection IDs for tracing
//! - Track live connections so shutdown can drain them

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tower::ServiceExt;

use crate::config::LimitsConfig;
use crate::net::codec::HttpConnection;

/// Relaxed ordering is enough; IDs only need to be unique.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Serve requests on `io` until the peer closes, an error occurs, or a drain starts.
pub async fn serve_connection<S>(
    io: S,
    router: Router,
    limits: &LimitsConfig,
    mut drain: watch::Receiver<bool>,
) where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let mut conn = HttpConnection::new(io, limits);
    let keep_alive = Duration::from_secs(limits.keep_alive_secs);
    // the idle window only applies between requests
    let mut idle = None;

    loop {
        if *drain.borrow() {
            break;
        }

        let read = tokio::select! {
            read = conn.read_request(idle) => read,
            _ = drain.changed() => break,
        };

        let incoming = match read {
            Ok(Some(incoming)) => incoming,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting unreadable request");
                if let Some(status) = e.status() {
                    let _ = conn.write_error(status, e.to_string()).await;
                }
                break;
            }
        };

        let response = match router.clone().oneshot(incoming.request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        match conn
            .write_response(response, incoming.head_only, incoming.keep_alive)
            .await
        {
            Ok(true) => idle = Some(keep_alive),
            Ok(false) => break,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to write response");
                break;
            }
        }
    }

    let _ = conn.shutdown().await;
}

/// Tracks active connections for graceful shutdown.
///
/// Uses a watch channel to tell connections to stop after their current request.
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    active_count: Arc<AtomicU64>,
    drain_tx: Arc<watch::Sender<bool>>,
    drain_rx: watch::Receiver<bool>,
}

impl ConnectionTracker {
    /// Create a new connection tracker.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            active_count: Arc::new(AtomicU64::new(0)),
            drain_tx: Arc::new(tx),
            drain_rx: rx,
        }
    }

    /// Record a new active connection. Returns a guard that decrements on drop.
    pub fn track(&self) -> ConnectionGuard {
        self.active_count.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            active_count: Arc::clone(&self.active_count),
            id: ConnectionId::new(),
        }
    }

    /// Get the current number of active connections.
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::SeqCst)
    }

    /// Receiver that flips to `true` once draining starts.
    pub fn drain_receiver(&self) -> watch::Receiver<bool> {
        self.drain_rx.clone()
    }

    /// Signal connections to finish and wait for them, up to `timeout`.
    ///
    /// Returns `true` if every connection closed in time.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let _ = self.drain_tx.send(true);
        let wait = async {
            while self.active_count() > 0 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        };
        tokio::time::timeout(timeout, wait).await.is_ok()
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that tracks a connection's lifetime.
/// Decrements active count when dropped.
#[derive(Debug)]
pub struct ConnectionGuard {
    active_count: Arc<AtomicU64>,
    id: ConnectionId,
}

impl ConnectionGuard {
    /// Get the connection ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active_count.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(connection_id = %self.id, "Connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::http::HttpServer;
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

    #[test]
    fn connection_id_unique() {
        let id1 = ConnectionId::new();
        let id2 = ConnectionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn connection_tracker_counts() {
        let tracker = ConnectionTracker::new();
        assert_eq!(tracker.active_count(), 0);

        let guard1 = tracker.track();
        let guard2 = tracker.track();
        assert_eq!(tracker.active_count(), 2);

        drop(guard1);
        assert_eq!(tracker.active_count(), 1);
        drop(guard2);
        assert_eq!(tracker.active_count(), 0);
    }

    #[tokio::test]
    async fn drain_times_out_with_open_connections() {
        let tracker = ConnectionTracker::new();
        let rx = tracker.drain_receiver();
        let _guard = tracker.track();

        assert!(!tracker.drain(Duration::from_millis(100)).await);
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn waits_for_first_request_regardless_of_idle_window() {
        let mut config = ServerConfig::default();
        config.observability.log_requests = false;
        config.limits.keep_alive_secs = 0;
        let server = HttpServer::new(config.clone());
        let tracker = ConnectionTracker::new();

        let (mut client, io) = duplex(64 * 1024);
        let task = tokio::spawn({
            let router = server.router();
            let drain = tracker.drain_receiver();
            async move { serve_connection(io, router, &config.limits, drain).await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        client
            .write_all(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut written = String::new();
        client.read_to_string(&mut written).await.unwrap();
        task.await.unwrap();

        assert!(written.starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[tokio::test]
    async fn serves_keep_alive_requests_in_order() {
        let mut config = ServerConfig::default();
        config.observability.log_requests = false;
        let server = HttpServer::new(config.clone());
        let tracker = ConnectionTracker::new();

        let (mut client, io) = duplex(64 * 1024);
        let task = tokio::spawn({
            let router = server.router();
            let drain = tracker.drain_receiver();
            async move { serve_connection(io, router, &config.limits, drain).await }
        });

        client
            .write_all(
                b"GET /one HTTP/1.1\r\nX-Mock-Counter: c\r\n\r\n\
                  GET /two HTTP/1.1\r\nX-Mock-Counter: c\r\nConnection: close\r\n\r\n",
            )
            .await
            .unwrap();

        let mut written = String::new();
        client.read_to_string(&mut written).await.unwrap();
        task.await.unwrap();

        assert_eq!(written.matches("HTTP/1.1 200 OK\r\n").count(), 2);
        assert!(written.contains("\"counter\":1"));
        assert!(written.contains("\"counter\":2"));
        assert!(written.find("/one").unwrap() < written.find("/two").unwrap());
    }
}
