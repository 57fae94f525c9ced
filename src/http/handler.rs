//! Handler registry.
//!
//! Maps fully qualified `Controller@action` names to async functions. The
//! registry doubles as the resolver a route table is validated against, so
//! a table that builds can always be dispatched.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::routing::{HandlerRef, HandlerResolver};

/// Everything a handler receives about the matched route.
#[derive(Debug)]
pub struct RouteRequest {
    pub name: Option<String>,
    pub handler: HandlerRef,
    pub params: Vec<(String, String)>,
    pub request: Request<Body>,
}

impl RouteRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A type-erased async handler.
pub type BoxedHandler = Arc<dyn Fn(RouteRequest) -> BoxFuture<'static, Response> + Send + Sync>;

/// Registry of handlers keyed by qualified name.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<HandlerRef, BoxedHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` as `controller@action`. A leading `\` on the controller is ignored.
    pub fn register<F, Fut>(&mut self, controller: &str, action: &str, f: F) -> &mut Self
    where
        F: Fn(RouteRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let key = HandlerRef::new(controller, action).resolve(None);
        let handler: BoxedHandler =
            Arc::new(move |req: RouteRequest| -> BoxFuture<'static, Response> { Box::pin(f(req)) });
        if self.handlers.insert(key.clone(), handler).is_some() {
            tracing::warn!(handler = %key, "Handler registered twice, keeping the latest");
        }
        self
    }

    pub fn get(&self, handler: &HandlerRef) -> Option<BoxedHandler> {
        self.handlers.get(handler).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl HandlerResolver for HandlerRegistry {
    fn resolves(&self, handler: &HandlerRef) -> bool {
        self.handlers.contains_key(handler)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.handlers.keys().map(ToString::to_string).collect();
        names.sort();
        f.debug_struct("HandlerRegistry").field("handlers", &names).finish()
    }
}
