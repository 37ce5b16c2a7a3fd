//! TCP listener with optional TLS.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Load TLS material once at startup
//! - Accept incoming TCP connections
//!
//! # Design Decisions
//! - No connection limit; the host network stack does the pooling
//! - The TLS handshake happens on the connection task, not in the accept loop

use std::net::SocketAddr;
use std::path::Path;

use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;

use crate::config::ListenerConfig;
use crate::net::tls::{load_tls_acceptor, TlsError};

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    Bind(#[source] std::io::Error),

    /// Failed to accept connection.
    #[error("Failed to accept: {0}")]
    Accept(#[source] std::io::Error),

    /// TLS material could not be loaded.
    #[error("TLS setup failed: {0}")]
    Tls(#[from] TlsError),
}

/// A TCP listener, optionally terminating TLS.
pub struct Listener {
    inner: TcpListener,
    tls: Option<TlsAcceptor>,
}

impl Listener {
    /// Bind to the configured address, loading TLS material if configured.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
            ListenerError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        let tls = config
            .tls
            .as_ref()
            .map(|tls| load_tls_acceptor(Path::new(&tls.cert_path), Path::new(&tls.key_path)))
            .transpose()?;

        let inner = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
        let listener = Self::from_tcp(inner, tls);

        tracing::info!(
            address = %listener.local_addr().map_err(ListenerError::Bind)?,
            tls = listener.is_tls(),
            "Listener bound"
        );
        Ok(listener)
    }

    /// Wrap an already-bound listener.
    pub fn from_tcp(inner: TcpListener, tls: Option<TlsAcceptor>) -> Self {
        Self { inner, tls }
    }

    /// Accept a new connection.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr), ListenerError> {
        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(peer_addr = %addr, error = %e, "Failed to set TCP_NODELAY");
        }
        tracing::debug!(peer_addr = %addr, "Connection accepted");
        Ok((stream, addr))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }

    /// Check if connections are TLS-terminated.
    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Acceptor for the per-connection handshake, if TLS is on.
    pub fn tls_acceptor(&self) -> Option<TlsAcceptor> {
        self.tls.clone()
    }
}
