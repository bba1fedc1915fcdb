//! Handler invocation and return-value normalization.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, error};

use crate::request::Request;
use crate::response::Response;
use crate::router::{Route, RouteMatch, Router};

/// Application handler: receives the current request and produces a value
/// the dispatcher normalizes into a response.
pub type Handler = dyn Fn(&Request) -> anyhow::Result<ReturnValue> + Send + Sync;

/// What a handler hands back, before normalization into a [`Response`].
#[derive(Debug)]
pub enum ReturnValue {
    /// Literal text; normalizes to a 200 response with the HTML media type.
    Text(String),
    /// Structured value; a JSON object normalizes to a 200 response with
    /// the JSON media type, any other shape is a normalization failure.
    Json(serde_json::Value),
    /// A fully built response, passed through unchanged.
    Full(Response),
}

impl From<&str> for ReturnValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for ReturnValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<serde_json::Value> for ReturnValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<Response> for ReturnValue {
    fn from(response: Response) -> Self {
        Self::Full(response)
    }
}

/// Resolve `request` against the registry, invoke the matching handler, and
/// normalize the outcome into a response.
///
/// Unknown paths and disallowed methods answer the fixed 404/405 responses.
/// A handler error, a handler panic, or an unnormalizable return value
/// answers the fixed 500 response; the failure detail goes to the log and
/// never to the client.
#[must_use]
pub fn dispatch(router: &Router, request: &Request) -> Response {
    let route = match router.resolve(&request.path, &request.method) {
        RouteMatch::Found(route) => route,
        RouteMatch::PathNotFound => {
            debug!(path = %request.path, "no route for path");
            return Response::not_found();
        }
        RouteMatch::MethodNotAllowed => {
            debug!(path = %request.path, method = %request.method, "method not allowed");
            return Response::method_not_allowed();
        }
    };

    debug!(path = %request.path, method = %request.method, "dispatching request");
    match invoke(route, request) {
        Ok(response) => response,
        Err(e) => {
            error!(path = %request.path, error = %e, "handler failed");
            Response::internal_error()
        }
    }
}

/// Run the handler with panic isolation, then normalize its return value.
fn invoke(route: &Route, request: &Request) -> anyhow::Result<Response> {
    let outcome = catch_unwind(AssertUnwindSafe(|| (route.handler)(request)))
        .map_err(|panic| anyhow::anyhow!("handler panicked: {}", panic_message(&panic)))?;
    normalize(outcome?)
}

/// Convert a raw handler return into a canonical response.
fn normalize(value: ReturnValue) -> anyhow::Result<Response> {
    match value {
        ReturnValue::Text(text) => Ok(Response::html(text)),
        ReturnValue::Json(value) if value.is_object() => Ok(Response::json(value)),
        ReturnValue::Json(value) => anyhow::bail!(
            "handler returned a JSON {} where an object was expected",
            value_kind(&value)
        ),
        ReturnValue::Full(response) => Ok(response),
    }
}

/// Human-readable kind of a JSON value, for the failure log.
fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Best-effort text from a panic payload.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
