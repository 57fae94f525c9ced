//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Build the route table from the route file or the built-in routes
//! - Assemble the server from handlers, middleware and table
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The table is checked against the handler registry before any listener binds

use std::path::Path;

use thiserror::Error;

use crate::config::{load_config, load_route_file, AppConfig, ConfigError};
use crate::controllers;
use crate::http::{middleware, HttpServer, ServerError};
use crate::routes;
use crate::routing::{BuildError, DeclarationError, HandlerResolver, RouteTable};

/// Anything that prevents the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Route file rejected: {0}")]
    Declaration(#[from] DeclarationError),

    #[error("Route table rejected: {0}")]
    Build(#[from] BuildError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Load `path`, or use the defaults when no file is given.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(AppConfig::default()),
    }
}

/// Build the table named by the configuration.
///
/// A configured route file replaces the built-in admin routes.
pub fn build_table(config: &AppConfig, resolver: &dyn HandlerResolver) -> Result<RouteTable, StartupError> {
    match &config.routes.file {
        Some(file) => {
            tracing::info!(file = %file, "Loading routes from file");
            let routes = load_route_file(Path::new(file))?;
            Ok(routes.build(resolver)?)
        }
        None => Ok(routes::builder().build(resolver)?),
    }
}

/// Wire handlers, middleware and the route table into a server.
pub fn assemble(config: AppConfig) -> Result<HttpServer, StartupError> {
    let handlers = controllers::registry();
    let middleware = middleware::registry(&config);
    let table = build_table(&config, &handlers)?;

    tracing::info!(
        routes = table.len(),
        handlers = handlers.len(),
        "Route table ready"
    );

    Ok(HttpServer::new(config, table, handlers, middleware)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_routes_by_default() {
        let server = assemble(AppConfig::default()).unwrap();
        assert_eq!(server.state().table().len(), 8);
    }

    #[test]
    fn test_route_file_with_unknown_handler_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[items]]
kind = "route"
method = "GET"
path = "/reports"
handler = 'App\Http\Controllers\Back\ReportsController@index'
"#
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.routes.file = Some(file.path().display().to_string());

        let err = assemble(config).err().unwrap();
        assert!(matches!(
            err,
            StartupError::Declaration(DeclarationError::Build(BuildError::UnresolvedHandler { .. }))
        ));
    }
}
