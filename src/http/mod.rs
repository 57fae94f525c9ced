//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID / trace / timeout layers)
//!     → RouteTable lookup (404 / 405 when nothing matches)
//!     → middleware/ (named guards, in declaration order)
//!     → handler.rs (registered controller action)
//!     → response.rs (JSON error bodies)
//!     → Send to client
//! ```

pub mod handler;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use handler::{BoxedHandler, HandlerRegistry, RouteRequest};
pub use middleware::{Middleware, MiddlewareRegistry, UnknownMiddleware};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
