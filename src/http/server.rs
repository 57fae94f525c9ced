//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with a single dispatching fallback
//! - Wire up middleware layers (request ID, tracing, timeout)
//! - Look up the route for each request in the current table
//! - Run named middleware, then the registered handler
//! - Swap in rebuilt route tables without interrupting requests

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::handler::{HandlerRegistry, RouteRequest};
use crate::http::middleware::{MiddlewareRegistry, UnknownMiddleware};
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::{error_response, method_not_allowed, not_found};
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    UnknownMiddleware(#[from] UnknownMiddleware),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into the dispatcher.
#[derive(Clone)]
pub struct AppState {
    table: Arc<ArcSwap<RouteTable>>,
    pub handlers: Arc<HandlerRegistry>,
    pub middleware: Arc<MiddlewareRegistry>,
}

impl AppState {
    /// Snapshot of the current route table.
    pub fn table(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    /// Atomically replace the route table.
    ///
    /// Requests already dispatched keep the table they loaded.
    pub fn replace_table(&self, table: RouteTable) -> Result<(), UnknownMiddleware> {
        if let Err(e) = self.middleware.check(&table) {
            metrics::record_reload(false);
            return Err(e);
        }

        let routes = table.len();
        self.table.store(Arc::new(table));
        metrics::record_reload(true);
        tracing::info!(routes, "Route table swapped");
        Ok(())
    }
}

/// HTTP server for the route table.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server.
    ///
    /// Fails if the table names middleware the registry does not provide.
    pub fn new(
        config: AppConfig,
        table: RouteTable,
        handlers: HandlerRegistry,
        middleware: MiddlewareRegistry,
    ) -> Result<Self, ServerError> {
        middleware.check(&table)?;

        let state = AppState {
            table: Arc::new(ArcSwap::from_pointee(table)),
            handlers: Arc::new(handlers),
            middleware: Arc::new(middleware),
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %request_id(req),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Tables received on `table_updates` replace the current one.
    pub async fn run(
        self,
        listener: TcpListener,
        mut table_updates: mpsc::UnboundedReceiver<RouteTable>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.state.table().len(),
            "HTTP server starting"
        );

        let state = self.state.clone();
        let reloads = tokio::spawn(async move {
            while let Some(table) = table_updates.recv().await {
                if let Err(e) = state.replace_table(table) {
                    tracing::error!("Rejected rebuilt route table: {}. Keeping current table.", e);
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await.ok();
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloads.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Look up the route, run its middleware, then its handler.
async fn dispatch(State(state): State<AppState>, mut request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let table = state.table();

    // 1. Match Route
    let Some(matched) = table.match_route(&method, &path) else {
        let allowed = table.allowed_methods(&path);
        let response = if allowed.is_empty() {
            not_found()
        } else {
            method_not_allowed(&allowed)
        };
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            "No route matched"
        );
        metrics::record_request(method.as_str(), response.status().as_u16(), "none", start_time);
        return response;
    };

    let entry = matched.entry;
    let route = entry.label();
    tracing::debug!(
        request_id = %request_id,
        route = %route,
        handler = %entry.handler,
        "Dispatching request"
    );

    // 2. Middleware, in declaration order
    for name in &entry.middleware {
        let Some(middleware) = state.middleware.get(name) else {
            tracing::error!(request_id = %request_id, middleware = %name, "Middleware missing from registry");
            return internal_error(&method, &route, start_time);
        };
        if let Err(response) = middleware.handle(&mut request) {
            metrics::record_request(method.as_str(), response.status().as_u16(), &route, start_time);
            return response;
        }
    }

    // 3. Handler
    let Some(handler) = state.handlers.get(&entry.handler) else {
        tracing::error!(request_id = %request_id, handler = %entry.handler, "Handler missing from registry");
        return internal_error(&method, &route, start_time);
    };

    let response = handler(RouteRequest {
        name: entry.name.clone(),
        handler: entry.handler.clone(),
        params: matched.params.clone(),
        request,
    })
    .await;

    metrics::record_request(method.as_str(), response.status().as_u16(), &route, start_time);
    response
}

fn internal_error(method: &axum::http::Method, route: &str, start_time: Instant) -> Response {
    metrics::record_request(method.as_str(), 500, route, start_time);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Route is misconfigured")
}
