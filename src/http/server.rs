//! HTTP server setup and the request orchestrator.
//!
//! # Responsibilities
//! - Create the Axum Router with the echo handler as fallback (every path
//!   is answered identically)
//! - Accept connections and hand them to the wire codec
//! - Build the descriptor, run the pipeline, finalize the response
//! - Stop accepting on shutdown and drain live connections

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{LimitsConfig, ServerConfig};
use crate::http::request::RequestHead;
use crate::net::connection::{serve_connection, ConnectionTracker};
use crate::net::listener::{Listener, ListenerError};
use crate::observability::{logging, metrics};
use crate::pipeline::{CounterStore, Exchange, Pipeline};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub log_requests: bool,
    pub max_body_bytes: usize,
}

/// HTTP echo server.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    counters: CounterStore,
}

impl HttpServer {
    /// Create a new server with a fresh counter store.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_counters(config, CounterStore::new())
    }

    /// Create a new server around an existing counter store.
    pub fn with_counters(config: ServerConfig, counters: CounterStore) -> Self {
        let state = AppState {
            pipeline: Arc::new(Pipeline::new(counters.clone())),
            log_requests: config.observability.log_requests,
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(state);
        Self {
            router,
            config,
            counters,
        }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(echo_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The application router, usable without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Counters shared by every request served by this instance.
    pub fn counters(&self) -> &CounterStore {
        &self.counters
    }

    /// Accept connections until `shutdown` fires, then drain.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Accept)?;
        tracing::info!(
            address = %addr,
            tls = listener.is_tls(),
            "HTTP server starting"
        );

        let tracker = ConnectionTracker::new();
        let limits: Arc<LimitsConfig> = Arc::new(self.config.limits.clone());

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            // transient (e.g. EMFILE); keep serving
                            tracing::warn!(error = %e, "Accept failed");
                            continue;
                        }
                    };

                    let guard = tracker.track();
                    let drain = tracker.drain_receiver();
                    let router = self.router.clone();
                    let limits = limits.clone();
                    let tls = listener.tls_acceptor();
                    metrics::record_connection();

                    tokio::spawn(async move {
                        let span = tracing::debug_span!("connection", id = %guard.id(), peer = %peer);
                        async move {
                            match tls {
                                Some(acceptor) => match acceptor.accept(stream).await {
                                    Ok(tls_stream) => {
                                        serve_connection(tls_stream, router, &limits, drain).await
                                    }
                                    Err(e) => {
                                        tracing::debug!(error = %e, "TLS handshake failed");
                                    }
                                },
                                None => serve_connection(stream, router, &limits, drain).await,
                            }
                            drop(guard);
                        }
                        .instrument(span)
                        .await
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
            }
        }

        let drain_timeout = Duration::from_secs(self.config.shutdown.drain_timeout_secs);
        if !tracker.drain(drain_timeout).await {
            tracing::warn!(
                remaining = tracker.active_count(),
                "Drain timeout elapsed with connections still open"
            );
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Orchestrates one request: descriptor, stages in order, JSON response.
async fn echo_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = Uuid::new_v4();

    let (parts, body) = request.into_parts();
    let head = parts
        .extensions
        .get::<RequestHead>()
        .cloned()
        .unwrap_or_else(|| RequestHead::from_parts(&parts));

    let mut exchange = Exchange::new(&head, body, state.max_body_bytes);
    let method = exchange.descriptor.method.clone();

    if state.log_requests {
        logging::log_request(&head, &exchange.descriptor.headers);
    }

    let span = tracing::debug_span!("pipeline", %request_id, method = %method, url = %head.target);
    let outcome = state.pipeline.execute(&mut exchange).instrument(span).await;

    let response = match outcome {
        Ok(()) => {
            let Exchange {
                descriptor,
                response,
                ..
            } = exchange;
            response.finalize(descriptor)
        }
        Err(e) => {
            tracing::error!(%request_id, error = %e, "Pipeline failed");
            e.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}
