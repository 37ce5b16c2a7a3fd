//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop)
//!     → tls.rs (optional TLS handshake)
//!     → connection.rs (request loop, shutdown tracking)
//!     → codec.rs (HTTP/1.1 framing, raw header capture)
//!     → Hand off to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Unbounded accept: every connection gets its own task
//! - Each connection tracked for graceful shutdown
//! - TLS is optional and handled transparently

pub mod codec;
pub mod connection;
pub mod listener;
pub mod tls;

pub use listener::{Listener, ListenerError};
