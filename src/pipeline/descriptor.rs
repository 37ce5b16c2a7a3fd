//! The JSON document echoed back for every request.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::http::request::{RawHeader, RequestHead};
use crate::pipeline::size::request_size;

/// Per-request record accumulated by the pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDescriptor {
    /// Uppercase method token.
    pub method: String,
    /// Request target as received.
    pub url: String,
    /// Same value as `url`.
    pub path: String,
    /// Lowercase header names, last value wins.
    pub headers: BTreeMap<String, String>,
    /// Alternating name/value entries in wire order.
    #[serde(serialize_with = "flatten_raw_headers")]
    pub raw_headers: Vec<RawHeader>,
    /// Request line plus header block, in octets.
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mock_response_header_error: Option<String>,
}

impl ResponseDescriptor {
    /// Build the initial descriptor; `size` is fixed from here on.
    pub fn from_head(head: &RequestHead) -> Self {
        Self {
            method: head.method.to_ascii_uppercase(),
            url: head.target.clone(),
            path: head.target.clone(),
            headers: head.normalized_headers(),
            raw_headers: head.raw_headers.clone(),
            size: request_size(head),
            body: None,
            counter: None,
            x_mock_response_header_error: None,
        }
    }
}

fn flatten_raw_headers<S: Serializer>(raw: &[RawHeader], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(raw.iter().flat_map(|h| [h.name.as_str(), h.value.as_str()]))
}
