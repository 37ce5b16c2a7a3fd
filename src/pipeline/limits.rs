//! Synthetic header-length limits.
//!
//! # Responsibilities
//! - Measure every normalized header as `"<name>: <value>"`
//! - Decide whether the single-header or the aggregate limit is exceeded
//! - Yield the paired "exceeded" status when a limit fires
//!
//! # Design Decisions
//! - Comparison is strict: a header exactly at the limit passes
//! - An unparsable limit disables its rule
//! - A missing or unparsable exceeded-status also disables the rule, so
//!   evaluation falls through to the next one instead of emitting garbage

use std::collections::BTreeMap;

use crate::pipeline::directives::{
    directive, parse_int, X_MOCK_LIMIT_ALL_HEADER_EXCEEDED_STATUS, X_MOCK_LIMIT_ALL_HEADER_LENGTH,
    X_MOCK_LIMIT_SINGLE_HEADER_EXCEEDED_STATUS, X_MOCK_LIMIT_SINGLE_HEADER_LENGTH,
};
use crate::pipeline::size::header_line_len;

/// True if any header line is strictly longer than `limit`.
pub fn any_header_exceeds(headers: &BTreeMap<String, String>, limit: i64) -> bool {
    headers
        .iter()
        .any(|(name, value)| header_line_len(name, value) as i64 > limit)
}

/// Sum of all header line lengths.
pub fn total_header_length(headers: &BTreeMap<String, String>) -> usize {
    headers
        .iter()
        .map(|(name, value)| header_line_len(name, value))
        .sum()
}

/// Status requested by `x-mock-limit-single-header-*`, if that rule fires.
pub fn single_header_limit_status(headers: &BTreeMap<String, String>) -> Option<i64> {
    let limit = parse_int(directive(headers, X_MOCK_LIMIT_SINGLE_HEADER_LENGTH)?)?;
    if !any_header_exceeds(headers, limit) {
        return None;
    }
    exceeded_status(headers, X_MOCK_LIMIT_SINGLE_HEADER_EXCEEDED_STATUS)
}

/// Status requested by `x-mock-limit-all-header-*`, if that rule fires.
pub fn all_headers_limit_status(headers: &BTreeMap<String, String>) -> Option<i64> {
    let limit = parse_int(directive(headers, X_MOCK_LIMIT_ALL_HEADER_LENGTH)?)?;
    if total_header_length(headers) as i64 <= limit {
        return None;
    }
    exceeded_status(headers, X_MOCK_LIMIT_ALL_HEADER_EXCEEDED_STATUS)
}

fn exceeded_status(headers: &BTreeMap<String, String>, name: &str) -> Option<i64> {
    let status = directive(headers, name).and_then(parse_int);
    if status.is_none() {
        tracing::warn!(header = name, "Header limit exceeded but no usable status supplied");
    }
    status
}
