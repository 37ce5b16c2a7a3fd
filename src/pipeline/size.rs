//! Wire-size accounting for the request line and header block.
//!
//! Works purely from the decoded head: each header contributes its name and
//! value plus a fixed 4 octets for the `": "` separator and the trailing CRLF.

use crate::http::request::{RawHeader, RequestHead};

/// `": "` plus `"\r\n"` around every header line.
const HEADER_OVERHEAD: usize = 4;

/// Blank line terminating the header block.
const HEAD_TERMINATOR: usize = 2;

/// Character length of `"<name>: <value>"`.
pub fn header_line_len(name: &str, value: &str) -> usize {
    octets(name) + 2 + octets(value)
}

/// Length of `"<METHOD> <target> HTTP/<version>\r\n"`.
pub fn request_line_len(method: &str, target: &str, version: &str) -> usize {
    // method, two spaces, "HTTP/", version, CRLF
    octets(method) + 1 + octets(target) + 1 + "HTTP/".len() + octets(version) + 2
}

/// Sum of every header line including its separator and CRLF.
pub fn header_block_len(raw_headers: &[RawHeader]) -> usize {
    raw_headers
        .iter()
        .map(|h| octets(&h.name) + octets(&h.value) + HEADER_OVERHEAD)
        .sum()
}

/// Exact byte length of the request line plus header block, terminator included.
pub fn request_size(head: &RequestHead) -> usize {
    request_line_len(&head.method, &head.target, &head.version)
        + header_block_len(&head.raw_headers)
        + HEAD_TERMINATOR
}

fn octets(s: &str) -> usize {
    s.chars().count()
}
