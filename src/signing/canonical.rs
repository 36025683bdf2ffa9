//! Canonical query construction for request signing.

use crate::types::ParameterList;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters that should NOT be percent-encoded in query components
/// (the RFC 3986 unreserved set).
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a query component for canonical requests.
pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_SET).to_string()
}

/// Build the canonical query string.
///
/// Parameters are serialized in byte-wise ascending key order, keys and
/// values percent-encoded and joined with `&`. Because [`ParameterList`]
/// already orders its entries, the output is independent of insertion order.
pub fn canonical_query(params: &ParameterList) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the string that gets signed.
///
/// Format:
/// ```text
/// HTTPMethod\n
/// Host\n
/// Path\n
/// CanonicalQueryString
/// ```
pub fn string_to_sign(method: &str, host: &str, path: &str, params: &ParameterList) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        method,
        host,
        path,
        canonical_query(params)
    )
}
