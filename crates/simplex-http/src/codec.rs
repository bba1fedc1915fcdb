//! Raw-byte request parsing.
//!
//! One connection carries exactly one request. The parser reads from the
//! socket in bounded chunks, accumulating until the blank-line separator
//! appears:
//!
//! ```text
//! METHOD SP PATH SP VERSION\r\n
//! Key: Value\r\n
//! ...
//! \r\n
//! <body of exactly Content-Length bytes>
//! ```
//!
//! Everything after the first separator counts toward the body, which is
//! read until the declared `Content-Length` is buffered and then truncated
//! to exactly that length. A parse failure aborts the connection without a
//! response.

use std::collections::HashMap;
use std::net::SocketAddr;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::request::Request;
use crate::response::CONTENT_TYPE;

/// Upper bound on a single socket read.
pub const MAX_CHUNK: usize = 4096;

/// Upper bound on the header section; a request that never produces the
/// blank-line separator within this many bytes is rejected.
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Exact header key carrying the declared body length.
const CONTENT_LENGTH: &str = "Content-Length";

/// Why parsing a request off the wire failed.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The peer closed the connection before a complete request arrived.
    #[error("connection closed before a complete request was received")]
    UnexpectedEof,

    /// No blank-line separator within [`MAX_HEADER_BYTES`].
    #[error("header section exceeded {MAX_HEADER_BYTES} bytes without a blank line")]
    HeaderSectionTooLarge,

    /// The header section was not valid UTF-8.
    #[error("header section is not valid UTF-8")]
    InvalidUtf8,

    /// The request line did not have exactly three space-separated tokens.
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// A header line had no colon separator.
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    /// The `Content-Length` value was not a non-negative integer.
    #[error("invalid Content-Length value: {0:?}")]
    InvalidContentLength(String),

    /// The body declared a JSON content type but did not decode.
    #[error("declared JSON body did not decode: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The socket read failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read and parse one request from `stream`.
///
/// Reads chunks of at most [`MAX_CHUNK`] bytes until the header/body
/// separator appears, then keeps reading until the declared body length is
/// buffered. An EOF before either point is a parse failure.
pub async fn read_request<S>(stream: &mut S, peer: SocketAddr) -> Result<Request, ParseError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(MAX_CHUNK);

    // Accumulate until the first blank line separates headers from body.
    let separator = loop {
        if let Some(pos) = find_separator(&buf) {
            break pos;
        }
        if buf.len() > MAX_HEADER_BYTES {
            return Err(ParseError::HeaderSectionTooLarge);
        }
        if read_chunk(stream, &mut buf).await? == 0 {
            return Err(ParseError::UnexpectedEof);
        }
    };

    let (method, path, version, headers) = {
        let head = std::str::from_utf8(&buf[..separator]).map_err(|_| ParseError::InvalidUtf8)?;
        let mut lines = head.split("\r\n");
        let (method, path, version) = parse_request_line(lines.next().unwrap_or_default())?;
        (method, path, version, parse_headers(lines)?)
    };

    let content_length = declared_length(&headers)?;

    // Anything already buffered past the separator belongs to the body.
    let mut body = buf.split_off(separator + 4);
    while body.len() < content_length {
        if read_chunk(stream, &mut body).await? == 0 {
            return Err(ParseError::UnexpectedEof);
        }
    }
    body.truncate(content_length);
    let body = body.freeze();

    let json = parse_declared_json(&headers, &body)?;

    Ok(Request {
        method,
        path,
        version,
        headers,
        body,
        json,
        peer,
    })
}

/// Read one bounded chunk, appending it to `buf`; returns the byte count.
async fn read_chunk<S>(stream: &mut S, buf: &mut BytesMut) -> std::io::Result<usize>
where
    S: AsyncRead + Unpin,
{
    let mut chunk = [0u8; MAX_CHUNK];
    let n = stream.read(&mut chunk).await?;
    buf.extend_from_slice(&chunk[..n]);
    Ok(n)
}

/// Position of the first `\r\n\r\n` in `data`.
fn find_separator(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|window| window == b"\r\n\r\n")
}

/// Split the request line into exactly (method, path, version).
///
/// The split is on single spaces, so a doubled space yields an empty extra
/// token and fails the three-token rule.
fn parse_request_line(line: &str) -> Result<(String, String, String), ParseError> {
    let mut tokens = line.split(' ');
    match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(method), Some(path), Some(version), None) => {
            Ok((method.to_owned(), path.to_owned(), version.to_owned()))
        }
        _ => Err(ParseError::MalformedRequestLine(line.to_owned())),
    }
}

/// Parse `Key: Value` header lines.
///
/// Keys are kept verbatim, values are trimmed, and a repeated key keeps the
/// last value seen.
fn parse_headers<'a>(
    lines: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, String>, ParseError> {
    let mut headers = HashMap::new();
    for line in lines {
        let Some((key, value)) = line.split_once(':') else {
            return Err(ParseError::MalformedHeaderLine(line.to_owned()));
        };
        headers.insert(key.to_owned(), value.trim().to_owned());
    }
    Ok(headers)
}

/// Declared body length: the `Content-Length` header, defaulting to zero
/// when absent.
fn declared_length(headers: &HashMap<String, String>) -> Result<usize, ParseError> {
    match headers.get(CONTENT_LENGTH) {
        Some(value) => value
            .parse()
            .map_err(|_| ParseError::InvalidContentLength(value.clone())),
        None => Ok(0),
    }
}

/// Decode the body as JSON when the declared content type asks for it.
///
/// A request without a `Content-Type` header, or with a non-JSON one, keeps
/// `json` empty without being an error.
fn parse_declared_json(
    headers: &HashMap<String, String>,
    body: &[u8],
) -> Result<Option<serde_json::Value>, ParseError> {
    match headers.get(CONTENT_TYPE) {
        Some(content_type) if content_type.starts_with("application/json") => {
            Ok(Some(serde_json::from_slice(body)?))
        }
        _ => Ok(None),
    }
}
