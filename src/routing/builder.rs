//! Route table construction.
//!
//! # Responsibilities
//! - Track group scope (prefix, middleware, namespace, name prefix) on a stack
//! - Record explicit routes and resource registrations in declaration order
//! - Resolve, validate and freeze everything into a `RouteTable`
//!
//! # Design Decisions
//! - Scope is captured when a route is declared, so `group` bodies can be
//!   plain closures over `&mut RouteTableBuilder`
//! - Names and handlers are only validated in `build`, which reports the
//!   first offending route
//! - `build` borrows the builder: building twice yields identical tables

use std::collections::HashMap;

use crate::routing::entry::RouteEntry;
use crate::routing::error::BuildError;
use crate::routing::handler::{nest_namespace, HandlerRef, HandlerResolver};
use crate::routing::method::Verb;
use crate::routing::pattern::{join_path, join_prefix, PathPattern};
use crate::routing::resource::{self, ResourceAction, ResourceOptions};
use crate::routing::table::RouteTable;

/// Attributes a group applies to everything declared inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAttributes {
    pub prefix: Option<String>,
    pub middleware: Vec<String>,
    pub namespace: Option<String>,
    pub name_prefix: Option<String>,
}

impl GroupAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn middleware<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Prefix prepended to every route name in the group, e.g. `admin.`.
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
struct Scope {
    prefix: String,
    middleware: Vec<String>,
    namespace: Option<String>,
    name_prefix: String,
}

impl Scope {
    fn nest(&self, attrs: &GroupAttributes) -> Scope {
        let mut middleware = self.middleware.clone();
        merge_middleware(&mut middleware, &attrs.middleware);

        Scope {
            prefix: match &attrs.prefix {
                Some(p) => join_prefix(&self.prefix, p),
                None => self.prefix.clone(),
            },
            middleware,
            namespace: match &attrs.namespace {
                Some(ns) => Some(nest_namespace(self.namespace.as_deref(), ns)),
                None => self.namespace.clone(),
            },
            name_prefix: format!(
                "{}{}",
                self.name_prefix,
                attrs.name_prefix.as_deref().unwrap_or_default()
            ),
        }
    }
}

fn merge_middleware(into: &mut Vec<String>, extra: &[String]) {
    for name in extra {
        if !into.contains(name) {
            into.push(name.clone());
        }
    }
}

#[derive(Debug, Clone)]
struct PendingRoute {
    methods: Vec<Verb>,
    path: String,
    handler: HandlerRef,
    name: Option<String>,
    middleware: Vec<String>,
    scope: Scope,
}

#[derive(Debug, Clone)]
struct PendingResource {
    name: String,
    controller: String,
    options: ResourceOptions,
    middleware: Vec<String>,
    scope: Scope,
}

/// Position of a declaration in `routes` or `resources`.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Route(usize),
    Resource(usize),
}

/// Collects route declarations and builds an immutable `RouteTable`.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    scopes: Vec<Scope>,
    routes: Vec<PendingRoute>,
    resources: Vec<PendingResource>,
    order: Vec<Slot>,
}

impl RouteTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn scope(&self) -> Scope {
        self.scopes.last().cloned().unwrap_or_default()
    }

    /// Evaluate `body` with `attrs` applied to every declaration inside it.
    pub fn group<F>(&mut self, attrs: GroupAttributes, body: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let nested = self.scope().nest(&attrs);
        self.scopes.push(nested);
        body(self);
        self.scopes.pop();
        self
    }

    /// Register a route for an explicit set of verbs.
    pub fn match_methods(
        &mut self,
        methods: &[Verb],
        path: &str,
        handler: impl Into<HandlerRef>,
    ) -> RouteHandle<'_> {
        let scope = self.scope();
        let handler = handler.into().resolve(scope.namespace.as_deref());
        let index = self.routes.len();
        self.routes.push(PendingRoute {
            methods: methods.to_vec(),
            path: join_path(&scope.prefix, path),
            handler,
            name: None,
            middleware: Vec::new(),
            scope,
        });
        self.order.push(Slot::Route(index));

        RouteHandle {
            route: &mut self.routes[index],
        }
    }

    pub fn get(&mut self, path: &str, handler: impl Into<HandlerRef>) -> RouteHandle<'_> {
        self.match_methods(&[Verb::Get], path, handler)
    }

    pub fn post(&mut self, path: &str, handler: impl Into<HandlerRef>) -> RouteHandle<'_> {
        self.match_methods(&[Verb::Post], path, handler)
    }

    pub fn put(&mut self, path: &str, handler: impl Into<HandlerRef>) -> RouteHandle<'_> {
        self.match_methods(&[Verb::Put], path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: impl Into<HandlerRef>) -> RouteHandle<'_> {
        self.match_methods(&[Verb::Patch], path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: impl Into<HandlerRef>) -> RouteHandle<'_> {
        self.match_methods(&[Verb::Delete], path, handler)
    }

    /// Register a route answering every verb.
    pub fn any(&mut self, path: &str, handler: impl Into<HandlerRef>) -> RouteHandle<'_> {
        self.match_methods(&Verb::ALL, path, handler)
    }

    /// Register the conventional routes of a resource.
    pub fn resource(&mut self, name: &str, controller: &str) -> ResourceHandle<'_> {
        self.push_resource(name, controller, false)
    }

    /// Register a resource without the create/edit form routes.
    pub fn api_resource(&mut self, name: &str, controller: &str) -> ResourceHandle<'_> {
        self.push_resource(name, controller, true)
    }

    fn push_resource(&mut self, name: &str, controller: &str, api: bool) -> ResourceHandle<'_> {
        let scope = self.scope();
        let index = self.resources.len();
        self.resources.push(PendingResource {
            name: name.to_string(),
            controller: controller.to_string(),
            options: ResourceOptions {
                api,
                ..Default::default()
            },
            middleware: Vec::new(),
            scope,
        });
        self.order.push(Slot::Resource(index));

        ResourceHandle {
            resource: &mut self.resources[index],
        }
    }

    /// Resolve every declaration and freeze the result.
    pub fn build<R>(&self, resolver: &R) -> Result<RouteTable, BuildError>
    where
        R: HandlerResolver + ?Sized,
    {
        let entries = self.entries()?;
        validate(&entries, resolver)?;

        let table = RouteTable::from_entries(entries);
        tracing::info!(routes = table.len(), "Route table built");
        Ok(table)
    }

    fn entries(&self) -> Result<Vec<RouteEntry>, BuildError> {
        let mut entries = Vec::new();

        for slot in &self.order {
            match *slot {
                Slot::Route(index) => {
                    let route = &self.routes[index];
                    let mut middleware = route.scope.middleware.clone();
                    merge_middleware(&mut middleware, &route.middleware);
                    let name = route
                        .name
                        .as_ref()
                        .map(|n| format!("{}{}", route.scope.name_prefix, n));
                    let path = parse_pattern(&route.path, name.as_deref(), &route.methods)?;

                    entries.push(RouteEntry {
                        methods: route.methods.clone(),
                        path,
                        handler: route.handler.clone(),
                        name,
                        middleware,
                    });
                }
                Slot::Resource(index) => {
                    let res = &self.resources[index];
                    entries.extend(expand_resource(res)?);
                }
            }
        }

        for entry in &entries {
            tracing::debug!(
                methods = %entry.methods_label(),
                path = %entry.path,
                name = entry.name.as_deref().unwrap_or("-"),
                handler = %entry.handler,
                "Route registered"
            );
        }

        Ok(entries)
    }
}

/// Reject duplicate names and handlers the resolver does not know.
fn validate<R>(entries: &[RouteEntry], resolver: &R) -> Result<(), BuildError>
where
    R: HandlerResolver + ?Sized,
{
    let mut names: HashMap<&str, &RouteEntry> = HashMap::new();

    for entry in entries {
        if let Some(name) = entry.name.as_deref() {
            if let Some(first) = names.insert(name, entry) {
                return Err(BuildError::DuplicateRouteName {
                    name: name.to_string(),
                    first: format!("{} {}", first.methods_label(), first.path),
                    second: format!("{} {}", entry.methods_label(), entry.path),
                });
            }
        }

        if !resolver.resolves(&entry.handler) {
            return Err(BuildError::UnresolvedHandler {
                route: entry.label(),
                handler: entry.handler.to_string(),
            });
        }
    }

    Ok(())
}

fn expand_resource(res: &PendingResource) -> Result<Vec<RouteEntry>, BuildError> {
    for unknown in res
        .options
        .except
        .iter()
        .chain(res.options.only.iter().flatten())
        .filter(|a| ResourceAction::from_name(a).is_none())
    {
        tracing::debug!(resource = %res.name, action = %unknown, "Ignoring unknown resource action");
    }

    let mut middleware = res.scope.middleware.clone();
    merge_middleware(&mut middleware, &res.middleware);

    resource::expand(&res.name, &res.options)
        .into_iter()
        .map(|expanded| {
            let name = format!("{}{}", res.scope.name_prefix, expanded.name);
            let methods = expanded.action.verbs().to_vec();
            let path = join_path(&res.scope.prefix, &expanded.local_path);
            let path = parse_pattern(&path, Some(&name), &methods)?;
            let handler = HandlerRef::new(res.controller.as_str(), expanded.action.as_str())
                .resolve(res.scope.namespace.as_deref());

            Ok(RouteEntry {
                methods,
                path,
                handler,
                name: Some(name),
                middleware: middleware.clone(),
            })
        })
        .collect()
}

fn parse_pattern(path: &str, name: Option<&str>, methods: &[Verb]) -> Result<PathPattern, BuildError> {
    PathPattern::parse(path).map_err(|source| BuildError::InvalidPattern {
        route: match name {
            Some(n) => n.to_string(),
            None => format!(
                "{} {}",
                methods.iter().map(Verb::as_str).collect::<Vec<_>>().join("|"),
                path
            ),
        },
        path: path.to_string(),
        source,
    })
}

/// Chained options for an explicit route.
pub struct RouteHandle<'a> {
    route: &'a mut PendingRoute,
}

impl RouteHandle<'_> {
    /// Set the route name. The enclosing group's name prefix is prepended.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.route.name = Some(name.into());
        self
    }

    /// Append route-local middleware after the inherited middleware.
    pub fn middleware<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route.middleware.extend(names.into_iter().map(Into::into));
        self
    }
}

/// Chained options for a resource registration.
pub struct ResourceHandle<'a> {
    resource: &'a mut PendingResource,
}

impl ResourceHandle<'_> {
    pub fn except<I, S>(self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource.options.except.extend(actions.into_iter().map(Into::into));
        self
    }

    pub fn only<I, S>(self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource.options.only = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    /// Override the member parameter name, keyed by resource name.
    pub fn parameters<I, K, V>(self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.resource
            .options
            .parameters
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Override route names, keyed by action.
    pub fn names<I, K, V>(self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.resource
            .options
            .names
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn middleware<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource.middleware.extend(names.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any_handler(_: &HandlerRef) -> bool {
        true
    }

    #[test]
    fn test_group_prefix_and_middleware() {
        let mut b = RouteTableBuilder::new();
        b.group(GroupAttributes::new().prefix("admin").middleware(["admin"]), |b| {
            b.group(GroupAttributes::new().prefix("/reports/").middleware(["audit", "admin"]), |b| {
                b.get("monthly", ("ReportsController", "monthly"));
            });
            b.get("/", ("AdminController", "index"));
        });
        b.get("/health", ("HealthController", "show"));

        let table = b.build(&any_handler).unwrap();
        let entries = table.entries();
        assert_eq!(entries[0].path.as_str(), "/admin/reports/monthly");
        assert_eq!(entries[0].middleware, vec!["admin", "audit"]);
        assert_eq!(entries[1].path.as_str(), "/admin/");
        assert_eq!(entries[1].middleware, vec!["admin"]);
        assert_eq!(entries[2].path.as_str(), "/health");
        assert!(entries[2].middleware.is_empty());
    }

    #[test]
    fn test_namespace_resolution() {
        let mut b = RouteTableBuilder::new();
        b.group(GroupAttributes::new().namespace("\\App\\Http\\Controllers"), |b| {
            b.group(GroupAttributes::new().namespace("Back"), |b| {
                b.get("a", ("DaysController", "index"));
                b.get("b", ("\\Vendor\\Thing", "run"));
            });
        });
        let table = b.build(&any_handler).unwrap();
        assert_eq!(
            table.entries()[0].handler.controller(),
            "App\\Http\\Controllers\\Back\\DaysController"
        );
        assert_eq!(table.entries()[1].handler.controller(), "Vendor\\Thing");
    }

    #[test]
    fn test_name_prefix_applies_to_routes_and_resources() {
        let mut b = RouteTableBuilder::new();
        b.group(GroupAttributes::new().name_prefix("admin."), |b| {
            b.get("/", ("AdminController", "index")).name("home");
            b.resource("days", "DaysController").only(["index"]);
        });
        let table = b.build(&any_handler).unwrap();
        assert!(table.by_name("admin.home").is_some());
        assert!(table.by_name("admin.days.index").is_some());
    }

    #[test]
    fn test_duplicate_name_fails() {
        let mut b = RouteTableBuilder::new();
        b.get("/a", ("A", "a")).name("dup");
        b.get("/b", ("B", "b")).name("dup");
        let err = b.build(&any_handler).unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateRouteName {
                name: "dup".into(),
                first: "GET /a".into(),
                second: "GET /b".into(),
            }
        );
    }

    #[test]
    fn test_unresolved_handler_names_route() {
        let mut b = RouteTableBuilder::new();
        b.get("/a", ("A", "a")).name("a");
        let err = b.build(&|_: &HandlerRef| false).unwrap_err();
        assert_eq!(
            err,
            BuildError::UnresolvedHandler {
                route: "a".into(),
                handler: "A@a".into(),
            }
        );
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let mut b = RouteTableBuilder::new();
        b.post("/days/{day", ("A", "a"));
        assert!(matches!(
            b.build(&any_handler),
            Err(BuildError::InvalidPattern { route, .. }) if route == "POST /days/{day"
        ));
    }

    #[test]
    fn test_route_local_middleware_is_appended() {
        let mut b = RouteTableBuilder::new();
        b.group(GroupAttributes::new().middleware(["admin"]), |b| {
            b.delete("/x", ("A", "a")).middleware(["confirm", "admin"]);
            b.resource("days", "DaysController").only(["index"]).middleware(["audit"]);
        });
        let table = b.build(&any_handler).unwrap();
        assert_eq!(table.entries()[0].middleware, vec!["admin", "confirm"]);
        assert_eq!(table.entries()[1].middleware, vec!["admin", "audit"]);
    }
}
