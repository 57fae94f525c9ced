//! Handler references and namespace resolution.
//!
//! A handler is named by a controller and an action, written
//! `Controller@action`. Controllers are resolved against the namespace of
//! the enclosing group unless they start with `\`, which marks them as
//! already fully qualified.

use std::fmt;

use serde::Serialize;

/// Namespace separator for controller names.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// A controller action, possibly not yet qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerRef {
    controller: String,
    action: String,
}

impl HandlerRef {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
        }
    }

    /// Parse `Controller@action`.
    pub fn parse(s: &str) -> Option<Self> {
        let (controller, action) = s.split_once('@')?;
        if controller.is_empty() || action.is_empty() || action.contains('@') {
            return None;
        }
        Some(Self::new(controller, action))
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// The controller name without its namespace.
    pub fn short_controller(&self) -> &str {
        self.controller
            .rsplit(NAMESPACE_SEPARATOR)
            .next()
            .unwrap_or(&self.controller)
    }

    /// Returns true if the controller is marked fully qualified.
    pub fn is_qualified(&self) -> bool {
        self.controller.starts_with(NAMESPACE_SEPARATOR)
    }

    /// Resolve this reference against `namespace`.
    ///
    /// The result never carries a leading separator.
    pub fn resolve(&self, namespace: Option<&str>) -> HandlerRef {
        let controller = match namespace {
            _ if self.is_qualified() => self.controller.trim_start_matches(NAMESPACE_SEPARATOR).to_string(),
            Some(ns) if !ns.trim_matches(NAMESPACE_SEPARATOR).is_empty() => format!(
                "{}{}{}",
                ns.trim_matches(NAMESPACE_SEPARATOR),
                NAMESPACE_SEPARATOR,
                self.controller
            ),
            _ => self.controller.clone(),
        };
        HandlerRef::new(controller, self.action.clone())
    }
}

impl<C: Into<String>, A: Into<String>> From<(C, A)> for HandlerRef {
    fn from((controller, action): (C, A)) -> Self {
        HandlerRef::new(controller, action)
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.controller, self.action)
    }
}

impl Serialize for HandlerRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Combine an inherited namespace with a group's namespace attribute.
///
/// A namespace starting with `\` replaces the inherited one; otherwise it is
/// appended below it.
pub fn nest_namespace(outer: Option<&str>, inner: &str) -> String {
    let trimmed = inner.trim_matches(NAMESPACE_SEPARATOR);
    match outer {
        _ if inner.starts_with(NAMESPACE_SEPARATOR) => trimmed.to_string(),
        Some(outer) if !outer.is_empty() => {
            format!("{}{}{}", outer, NAMESPACE_SEPARATOR, trimmed)
        }
        _ => trimmed.to_string(),
    }
}

/// Looks up whether a fully qualified handler exists.
///
/// The route table consults a resolver once, at build time.
pub trait HandlerResolver {
    fn resolves(&self, handler: &HandlerRef) -> bool;
}

impl<F> HandlerResolver for F
where
    F: Fn(&HandlerRef) -> bool,
{
    fn resolves(&self, handler: &HandlerRef) -> bool {
        self(handler)
    }
}
