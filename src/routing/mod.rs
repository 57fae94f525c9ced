//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     group / resource / get ... calls, or a route file (declare.rs)
//!     → builder.rs (scope stack: prefix, middleware, namespace)
//!     → resource.rs (conventional CRUD expansion)
//!     → pattern.rs (parse paths) + handler.rs (resolve handlers)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (method, path)
//!     → table.rs (first matching entry)
//!     → Return: RouteMatch (entry + params) or no match
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same declarations always build the same table
//! - First match wins (declaration order)
//! - Build errors are fatal and name the offending route

pub mod builder;
pub mod declare;
pub mod entry;
pub mod error;
pub mod handler;
pub mod method;
pub mod pattern;
pub mod resource;
pub mod table;

pub use builder::{GroupAttributes, RouteTableBuilder};
pub use declare::{DeclarationError, RouteFile};
pub use entry::RouteEntry;
pub use error::{BuildError, UrlError};
pub use handler::{HandlerRef, HandlerResolver};
pub use method::Verb;
pub use table::{RouteMatch, RouteTable};
