//! Single-exchange HTTP/1.x transport for the Simplex server.
//!
//! Each accepted TCP connection carries exactly one request/response
//! exchange; the socket closes after the response is written, and the close
//! delimits the body. The crate provides:
//!
//! - **Codec**: raw-byte request parsing off the socket
//! - **Router**: exact-path registry with allowed-method sets
//! - **Dispatch**: handler invocation and return-value normalization
//! - **Response**: response building and wire serialization
//! - **Service**: the per-connection parse, dispatch, serialize pipeline
//! - **Server**: listener binding, accept loop, and bounded admission

pub mod codec;
pub mod dispatch;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod service;

pub use codec::ParseError;
pub use dispatch::{Handler, ReturnValue, dispatch};
pub use request::Request;
pub use response::{Body, CONTENT_TYPE, HTML_TYPE, JSON_TYPE, Response};
pub use router::{Route, RouteMatch, Router};
pub use server::Server;
pub use service::handle_connection;
