//! Response carrier and wire serialization.

/// Exact header name used for content negotiation.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Media type written for JSON bodies.
pub const JSON_TYPE: &str = "application/json;charset=utf-8";

/// Media type written for literal text bodies.
pub const HTML_TYPE: &str = "text/html;charset=utf-8";

/// Response body payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Literal text, written to the wire as-is.
    Text(String),
    /// Structured value, JSON-encoded at serialization time. Encoding it
    /// forces the JSON media type onto the response.
    Json(serde_json::Value),
}

/// A response ready for serialization.
///
/// Headers live in a plain vector so serialization preserves insertion
/// order; setting an existing header replaces its value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Body payload.
    pub body: Body,
    /// Headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Numeric status code.
    pub status: u16,
}

impl Response {
    /// A 200 response carrying literal text with the HTML media type.
    #[must_use]
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            body: Body::Text(text.into()),
            headers: vec![(CONTENT_TYPE.to_owned(), HTML_TYPE.to_owned())],
            status: 200,
        }
    }

    /// A 200 response carrying a structured value with the JSON media type.
    #[must_use]
    pub fn json(value: serde_json::Value) -> Self {
        Self {
            body: Body::Json(value),
            headers: vec![(CONTENT_TYPE.to_owned(), JSON_TYPE.to_owned())],
            status: 200,
        }
    }

    /// The fixed response for an unregistered path.
    #[must_use]
    pub fn not_found() -> Self {
        Self::html("<html><body>Not Found 404</body></html>").with_status(404)
    }

    /// The fixed response for a disallowed method on a registered path.
    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::html("<html><body>Method Not Allowed</body></html>").with_status(405)
    }

    /// The fixed response for a failed handler.
    #[must_use]
    pub fn internal_error() -> Self {
        Self::html("<html><body>Server Internal Error</body></html>").with_status(500)
    }

    /// Replace the status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set a header: replaces the value of an existing name in place,
    /// otherwise appends.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, &name.into(), &value.into());
        self
    }

    /// Serialize into the exact bytes written back to the client.
    ///
    /// The status line echoes the request's protocol `version` and carries
    /// the canonical reason phrase for the status code, falling back to
    /// `OK` for unregistered codes. A [`Body::Json`] body is encoded here,
    /// and encoding overwrites the `Content-Type` header with [`JSON_TYPE`]
    /// whatever the response carried before. No `Content-Length` is added;
    /// the body is delimited by the connection close.
    #[must_use]
    pub fn into_bytes(self, version: &str) -> Vec<u8> {
        let Self {
            body,
            mut headers,
            status,
        } = self;

        let body = match body {
            Body::Text(text) => text,
            Body::Json(value) => {
                set_header(&mut headers, CONTENT_TYPE, JSON_TYPE);
                serde_json::to_string(&value).expect("JSON serialization of a Value cannot fail")
            }
        };

        let mut wire = format!("{version} {status} {}\r\n", reason_phrase(status));
        for (name, value) in &headers {
            wire.push_str(&format!("{name}: {value}\r\n"));
        }
        wire.push_str("\r\n");

        let mut bytes = wire.into_bytes();
        bytes.extend_from_slice(body.as_bytes());
        bytes
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter().position(|(key, _)| key.as_str() == name) {
        Some(idx) => headers[idx].1 = value.to_owned(),
        None => headers.push((name.to_owned(), value.to_owned())),
    };
}

/// Canonical reason phrase for a status code, `OK` for anything outside the
/// registered range.
fn reason_phrase(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("OK")
}
