//! Resolved route entries.

use serde::Serialize;

use crate::routing::handler::HandlerRef;
use crate::routing::method::Verb;
use crate::routing::pattern::PathPattern;

/// A fully resolved route: absolute path, qualified handler, merged middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub methods: Vec<Verb>,
    pub path: PathPattern,
    pub handler: HandlerRef,
    pub name: Option<String>,
    pub middleware: Vec<String>,
}

impl RouteEntry {
    /// Returns true if this entry is registered for `method`.
    pub fn accepts(&self, method: &axum::http::Method) -> bool {
        self.methods.iter().any(|v| v.accepts(method))
    }

    /// Methods joined for display, e.g. `PUT|PATCH`.
    pub fn methods_label(&self) -> String {
        self.methods
            .iter()
            .map(Verb::as_str)
            .collect::<Vec<_>>()
            .join("|")
    }

    /// How this entry is referred to in diagnostics: its name, or method and path.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{} {}", self.methods_label(), self.path),
        }
    }
}
