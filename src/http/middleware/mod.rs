//! Named middleware.
//!
//! # Data Flow
//! ```text
//! matched RouteEntry.middleware (e.g. ["admin"])
//!     → MiddlewareRegistry lookup by name
//!     → each middleware runs in order, may short-circuit with a response
//!     → handler
//! ```
//!
//! # Design Decisions
//! - Names are checked against the registry before a table is served
//! - Middleware sees the request before the handler; it may annotate it
//!   through extensions but cannot rewrite the matched route

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use thiserror::Error;

use crate::config::AppConfig;
use crate::routing::RouteTable;

pub mod admin;

pub use admin::AdminGuard;

/// A request-processing step that runs before the handler.
pub trait Middleware: Send + Sync {
    /// Return `Err(response)` to stop the request here.
    fn handle(&self, request: &mut Request<Body>) -> Result<(), Response>;
}

/// A route refers to middleware nobody registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("route `{route}` uses unknown middleware `{middleware}`")]
pub struct UnknownMiddleware {
    pub route: String,
    pub middleware: String,
}

/// Middleware by name.
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
    entries: HashMap<String, Arc<dyn Middleware>>,
}

impl MiddlewareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, middleware: impl Middleware + 'static) -> &mut Self {
        self.entries.insert(name.into(), Arc::new(middleware));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Middleware>> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Check that every middleware the table names is registered.
    pub fn check(&self, table: &RouteTable) -> Result<(), UnknownMiddleware> {
        for entry in table.entries() {
            if let Some(missing) = entry.middleware.iter().find(|m| !self.contains(m)) {
                return Err(UnknownMiddleware {
                    route: entry.label(),
                    middleware: missing.clone(),
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("MiddlewareRegistry").field("entries", &names).finish()
    }
}

/// The middleware this service provides.
pub fn registry(config: &AppConfig) -> MiddlewareRegistry {
    let mut registry = MiddlewareRegistry::new();
    registry.register(crate::routes::ADMIN_MIDDLEWARE, AdminGuard::new(&config.admin.api_key));
    registry
}
