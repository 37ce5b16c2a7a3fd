//! Inbound request head as it appeared on the wire.
//!
//! # Responsibilities
//! - Keep the raw header list (order, casing, duplicates) next to the parsed request
//! - Provide the normalized lowercase name → value view used by the pipeline
//! - Reconstruct a best-effort head when a request did not come through the codec
//!
//! # Design Decisions
//! - Text is decoded one octet per character (Latin-1), so character counts
//!   equal wire byte counts for every field
//! - The head travels as a request extension so axum handlers can reach it

use std::collections::BTreeMap;

use axum::http::{request::Parts, Version};
use serde::Serialize;

/// A single header exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawHeader {
    pub name: String,
    pub value: String,
}

impl RawHeader {
    /// Create a new raw header.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Request line and header block of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    /// Method token as sent by the client.
    pub method: String,
    /// Request target exactly as received (origin-form path plus query, usually).
    pub target: String,
    /// Protocol version without the `HTTP/` prefix, e.g. `1.1`.
    pub version: String,
    /// Headers in wire order with original casing and duplicates.
    pub raw_headers: Vec<RawHeader>,
}

impl RequestHead {
    /// Rebuild a head from already-parsed request parts.
    ///
    /// Header names come back lowercased and grouped by name; used when the
    /// request bypassed the wire codec (e.g. a router driven directly).
    pub fn from_parts(parts: &Parts) -> Self {
        let target = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.to_string());

        let raw_headers = parts
            .headers
            .iter()
            .map(|(name, value)| RawHeader::new(name.as_str(), decode_octets(value.as_bytes())))
            .collect();

        Self {
            method: parts.method.as_str().to_string(),
            target,
            version: version_label(parts.version).to_string(),
            raw_headers,
        }
    }

    /// Normalized header view: lowercase names, last value wins.
    pub fn normalized_headers(&self) -> BTreeMap<String, String> {
        self.raw_headers
            .iter()
            .map(|h| (h.name.to_ascii_lowercase(), h.value.clone()))
            .collect()
    }
}

/// Decode raw bytes one octet per character.
pub fn decode_octets(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Version label in the `major.minor` form used on the request line.
pub fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "1.1",
    }
}
