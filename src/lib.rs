//! Admin route table library.
//!
//! Declares the routes of an administrative backend (a guarded, prefixed
//! group holding a `days` resource) and serves them over HTTP.

pub mod config;
pub mod controllers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routes;
pub mod routing;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteTable, RouteTableBuilder};
