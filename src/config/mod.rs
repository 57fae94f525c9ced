//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!
//! route file (TOML, optional)
//!     → loader.rs (parse into RouteFile)
//!     → routing builder → RouteTable
//!
//! On route file change:
//!     watcher.rs detects change
//!     → loader.rs loads new declarations
//!     → table is rebuilt and validated
//!     → sent to the server for an atomic swap
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only the route table reloads
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_route_file, ConfigError};
pub use schema::{AdminConfig, AppConfig, ListenerConfig, ObservabilityConfig, RoutesConfig, TimeoutConfig};
pub use watcher::RouteFileWatcher;
