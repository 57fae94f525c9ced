//! Route file watcher for hot reload.
//!
//! On every change the file is reloaded and built into a fresh table. Only
//! tables that build cleanly are sent on; failures keep the current table.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_route_file;
use crate::routing::{HandlerResolver, RouteTable};

/// Resolver shared with the watcher thread.
pub type SharedResolver = Arc<dyn HandlerResolver + Send + Sync>;

/// A watcher that rebuilds the route table when the route file changes.
pub struct RouteFileWatcher {
    path: PathBuf,
    resolver: SharedResolver,
    update_tx: mpsc::UnboundedSender<RouteTable>,
}

impl RouteFileWatcher {
    /// Create a new RouteFileWatcher.
    ///
    /// Returns the watcher and a receiver for rebuilt tables.
    pub fn new(path: &Path, resolver: SharedResolver) -> (Self, mpsc::UnboundedReceiver<RouteTable>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                resolver,
                update_tx,
            },
            update_rx,
        )
    }

    /// Load and build the watched file once.
    pub fn rebuild(&self) -> Option<RouteTable> {
        rebuild(&self.path, self.resolver.as_ref())
    }

    /// Start watching the file in a background thread.
    ///
    /// The parent directory is watched rather than the file itself, so
    /// saves that replace the file by renaming over it keep being seen.
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name = self
            .path
            .file_name()
            .map(ToOwned::to_owned)
            .ok_or_else(|| notify::Error::generic("route file path has no file name"))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let tx = self.update_tx.clone();
        let path = self.path.clone();
        let resolver = Arc::clone(&self.resolver);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let touches_file = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(file_name.as_os_str()));
                    if touches_file && (event.kind.is_modify() || event.kind.is_create()) {
                        tracing::info!(path = ?path, "Route file change detected, rebuilding...");
                        if let Some(table) = rebuild(&path, resolver.as_ref()) {
                            if tx.send(table).is_err() {
                                tracing::debug!("Route table receiver dropped");
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Route file watcher started");
        Ok(watcher)
    }
}

fn rebuild(path: &Path, resolver: &(dyn HandlerResolver + Send + Sync)) -> Option<RouteTable> {
    let file = match load_route_file(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::error!("Failed to reload routes: {}. Keeping current table.", e);
            return None;
        }
    };

    match file.build(resolver) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::error!("Failed to rebuild routes: {}. Keeping current table.", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::HandlerRef;
    use std::io::Write;

    #[test]
    fn test_rebuild_keeps_nothing_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[items]]\nkind = \"route\"\nmethod = \"GET\"\npath = \"/\"\nhandler = \"Home@index\"\nname = \"home\""
        )
        .unwrap();

        let accept_all: SharedResolver = Arc::new(|_: &HandlerRef| true);
        let (watcher, _rx) = RouteFileWatcher::new(file.path(), accept_all);
        assert_eq!(watcher.rebuild().map(|t| t.len()), Some(1));

        let reject_all: SharedResolver = Arc::new(|_: &HandlerRef| false);
        let (watcher, _rx) = RouteFileWatcher::new(file.path(), reject_all);
        assert!(watcher.rebuild().is_none());
    }

    fn routes_toml(count: usize) -> String {
        (0..count)
            .map(|i| {
                format!(
                    "[[items]]\nkind = \"route\"\nmethod = \"GET\"\npath = \"/r{i}\"\nhandler = \"Home@r{i}\"\n\n"
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_reload_survives_replacing_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        std::fs::write(&path, routes_toml(1)).unwrap();

        let accept_all: SharedResolver = Arc::new(|_: &HandlerRef| true);
        let (watcher, mut rx) = RouteFileWatcher::new(&path, accept_all);
        let _watcher = watcher.run().unwrap();

        // Editors write a sibling file and rename it over the original
        for count in 2..=4 {
            let tmp = dir.path().join(".routes.toml.swp");
            std::fs::write(&tmp, routes_toml(count)).unwrap();
            std::fs::rename(&tmp, &path).unwrap();
            tokio::time::sleep(Duration::from_millis(300)).await;
        }

        let mut seen = Vec::new();
        while let Ok(Some(table)) = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await {
            seen.push(table.len());
            if table.len() == 4 {
                break;
            }
        }
        assert_eq!(seen.last(), Some(&4), "tables received: {:?}", seen);
    }
}
