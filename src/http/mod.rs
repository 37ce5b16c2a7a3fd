//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → net::codec (request head, raw headers, body)
//!     → server.rs (Axum router, echo handler)
//!     → pipeline (stages mutate descriptor + response)
//!     → response.rs (status, headers, JSON body)
//!     → net::codec writes the response
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RawHeader, RequestHead};
pub use response::OutboundResponse;
pub use server::HttpServer;
