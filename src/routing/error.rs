//! Route table errors.

use thiserror::Error;

use crate::routing::pattern::PatternError;

/// Fatal errors raised while building a route table.
///
/// Each variant names the offending route so startup can abort with a
/// useful diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Two entries share a route name.
    #[error("duplicate route name `{name}`: `{first}` and `{second}`")]
    DuplicateRouteName {
        name: String,
        first: String,
        second: String,
    },

    /// A handler could not be found in the handler registry.
    #[error("route `{route}` refers to unknown handler `{handler}`")]
    UnresolvedHandler { route: String, handler: String },

    /// A path pattern failed to parse.
    #[error("route `{route}` has an invalid path `{path}`: {source}")]
    InvalidPattern {
        route: String,
        path: String,
        #[source]
        source: PatternError,
    },
}

/// Errors from named URL generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("no route named `{0}`")]
    UnknownRoute(String),

    #[error("route `{route}` requires parameter `{param}`")]
    MissingParameter { route: String, param: String },
}
