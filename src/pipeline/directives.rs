//! Request headers that script the mock response.

use std::collections::BTreeMap;

pub const X_MOCK_RESPONSE_HEADER: &str = "x-mock-response-header";
pub const X_MOCK_BODY: &str = "x-mock-body";
pub const X_MOCK_COUNTER: &str = "x-mock-counter";
pub const X_MOCK_STATUS: &str = "x-mock-status";
pub const X_MOCK_LIMIT_SINGLE_HEADER_LENGTH: &str = "x-mock-limit-single-header-length";
pub const X_MOCK_LIMIT_SINGLE_HEADER_EXCEEDED_STATUS: &str =
    "x-mock-limit-single-header-exceeded-status";
pub const X_MOCK_LIMIT_ALL_HEADER_LENGTH: &str = "x-mock-limit-all-header-length";
pub const X_MOCK_LIMIT_ALL_HEADER_EXCEEDED_STATUS: &str = "x-mock-limit-all-header-exceeded-status";
pub const X_MOCK_DELAY: &str = "x-mock-delay";

/// Body value that echoes the request target back.
pub const MIRROR_URL: &str = "mirror-url";

/// Look up a directive in the normalized header map.
///
/// An empty value counts as absent.
pub fn directive<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

/// Parse the leading base-10 integer of `input`.
///
/// Leading whitespace and a single sign are accepted, parsing stops at the
/// first non-digit. Returns `None` when no digit is found or the value does
/// not fit in an `i64`.
pub fn parse_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
