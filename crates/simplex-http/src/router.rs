//! Route registry: exact paths bound to allowed-method sets and handlers.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use simplex_core::Method;

use crate::dispatch::{Handler, ReturnValue};
use crate::request::Request;

/// A registered route: the allowed methods and the handler to invoke.
pub struct Route {
    /// Methods this route accepts; never empty.
    pub methods: HashSet<Method>,
    /// Shared handler invoked on a match.
    pub handler: Arc<Handler>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("methods", &self.methods)
            .field("handler", &"...")
            .finish()
    }
}

/// Outcome of resolving a request against the registry.
#[derive(Debug)]
pub enum RouteMatch<'a> {
    /// Path and method both matched.
    Found(&'a Route),
    /// No route is registered for the path.
    PathNotFound,
    /// The path is registered but does not allow the method.
    MethodNotAllowed,
}

/// Exact-path route registry.
///
/// Populated before the server starts accepting connections, then shared
/// read-only across connection tasks. Paths match byte-for-byte: no
/// patterns, no parameters, no trailing-slash folding.
#[derive(Debug, Default)]
pub struct Router {
    routes: HashMap<String, Route>,
}

impl Router {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `path`.
    ///
    /// An empty `methods` slice defaults to GET only. Registering the same
    /// path again replaces the earlier entry entirely, methods included.
    pub fn route<H>(&mut self, path: impl Into<String>, methods: &[Method], handler: H) -> &mut Self
    where
        H: Fn(&Request) -> anyhow::Result<ReturnValue> + Send + Sync + 'static,
    {
        let methods: HashSet<Method> = if methods.is_empty() {
            HashSet::from([Method::Get])
        } else {
            methods.iter().copied().collect()
        };
        let handler: Arc<Handler> = Arc::new(handler);
        self.routes.insert(path.into(), Route { methods, handler });
        self
    }

    /// Resolve a wire path and method token against the registry.
    ///
    /// Path lookup happens first, so an unregistered path answers
    /// [`RouteMatch::PathNotFound`] whatever the method. A token that does
    /// not name a known method can never be in an allowed set, so it lands
    /// on [`RouteMatch::MethodNotAllowed`] for any registered path.
    #[must_use]
    pub fn resolve(&self, path: &str, method: &str) -> RouteMatch<'_> {
        let Some(route) = self.routes.get(path) else {
            return RouteMatch::PathNotFound;
        };

        match Method::from_name(method) {
            Some(known) if route.methods.contains(&known) => RouteMatch::Found(route),
            _ => RouteMatch::MethodNotAllowed,
        }
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the registry has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
