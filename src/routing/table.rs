//! Route lookup and URL generation.
//!
//! # Responsibilities
//! - Store resolved routes in declaration order
//! - Look up the route for a (method, path) pair
//! - Generate paths for named routes
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) name lookup via HashMap
//! - O(n) path scan; first match wins, so declaration order decides overlaps
//! - Explicit no-match rather than a silent default

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use axum::http::Method;
use serde::Serialize;

use crate::routing::entry::RouteEntry;
use crate::routing::error::UrlError;
use crate::routing::method::Verb;

/// A matched route with its decoded path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: Vec<(String, String)>,
}

impl RouteMatch<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Immutable, ordered route table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    #[serde(skip)]
    names: HashMap<String, usize>,
}

impl RouteTable {
    /// Entries must already have unique names.
    pub(crate) fn from_entries(entries: Vec<RouteEntry>) -> Self {
        let names = entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.name.clone().map(|n| (n, i)))
            .collect();
        Self { entries, names }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteEntry> {
        self.names.get(name).map(|&i| &self.entries[i])
    }

    /// Find the first route registered for `method` whose pattern matches `path`.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.entries
            .iter()
            .filter(|entry| entry.accepts(method))
            .find_map(|entry| {
                entry
                    .path
                    .matches(path)
                    .map(|params| RouteMatch { entry, params })
            })
    }

    /// Verbs registered for any route whose pattern matches `path`.
    pub fn allowed_methods(&self, path: &str) -> Vec<Verb> {
        let verbs: BTreeSet<Verb> = self
            .entries
            .iter()
            .filter(|entry| entry.path.matches(path).is_some())
            .flat_map(|entry| entry.methods.iter().copied())
            .collect();
        verbs.into_iter().collect()
    }

    /// Generate the path of a named route.
    pub fn url(&self, name: &str, params: &[(&str, &str)]) -> Result<String, UrlError> {
        let entry = self
            .by_name(name)
            .ok_or_else(|| UrlError::UnknownRoute(name.to_string()))?;

        let params: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        entry
            .path
            .expand(&params)
            .map_err(|param| UrlError::MissingParameter {
                route: name.to_string(),
                param,
            })
    }

    /// Every middleware name referenced by the table.
    pub fn middleware_names(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .flat_map(|e| e.middleware.iter().map(String::as_str))
            .collect()
    }
}

/// Renders the table as aligned columns for listing.
impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<[String; 5]> = self
            .entries
            .iter()
            .map(|e| {
                [
                    e.methods_label(),
                    e.path.to_string(),
                    e.name.clone().unwrap_or_default(),
                    format!("{}@{}", e.handler.short_controller(), e.handler.action()),
                    e.middleware.join(","),
                ]
            })
            .collect();

        let header = ["METHOD", "PATH", "NAME", "HANDLER", "MIDDLEWARE"].map(String::from);
        let mut widths = header.clone().map(|h| h.len());
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.len());
            }
        }

        for row in std::iter::once(&header).chain(rows.iter()) {
            let line = row
                .iter()
                .zip(widths)
                .map(|(cell, w)| format!("{:<w$}", cell, w = w))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
