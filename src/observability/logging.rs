//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Emit the per-request console line
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Request lines carry the same fields the server always printed:
//!   version, method, url and the normalized headers

use std::collections::BTreeMap;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::http::request::RequestHead;

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("mock_echo_server={default_level},tower_http=warn"))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Log an inbound request before any stage runs.
pub fn log_request(head: &RequestHead, headers: &BTreeMap<String, String>) {
    let headers = serde_json::to_string(headers).unwrap_or_default();
    tracing::info!(
        target: "mock_echo_server::request",
        version = %head.version,
        method = %head.method,
        url = %head.target,
        headers = %headers,
        "v{} {} {}",
        head.version,
        head.method,
        head.target,
    );
}
