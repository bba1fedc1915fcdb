//! Parsed request carrier.

use std::collections::HashMap;
use std::net::SocketAddr;

use bytes::Bytes;

/// A single parsed HTTP request.
///
/// Built once per connection by [`crate::codec::read_request`] and immutable
/// afterwards; handlers receive it by shared reference.
#[derive(Debug, Clone)]
pub struct Request {
    /// Wire method token, verbatim (`GET`, `POST`, ...).
    pub method: String,
    /// Exact request path; no normalization or decoding is applied.
    pub path: String,
    /// Protocol version token, echoed verbatim in the response status line.
    pub version: String,
    /// Header map with case-sensitive keys; a repeated key keeps the last
    /// value seen.
    pub headers: HashMap<String, String>,
    /// Raw body, exactly as long as the declared `Content-Length`.
    pub body: Bytes,
    /// Body decoded as JSON, present only when the request declared a JSON
    /// content type.
    pub json: Option<serde_json::Value>,
    /// Originating address of the connection.
    pub peer: SocketAddr,
}

impl Request {
    /// Look up a header by its exact, case-sensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
