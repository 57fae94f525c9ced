//! Route declarations loaded from files.
//!
//! A route file is a TOML document whose `items` mirror the builder calls:
//!
//! ```toml
//! [[items]]
//! kind = "group"
//! prefix = "admin"
//! middleware = ["admin"]
//! namespace = '\App\Http\Controllers\Back'
//!
//! [[items.items]]
//! kind = "resource"
//! name = "days"
//! controller = "DaysController"
//! except = ["show"]
//! ```
//!
//! Applying a file to a builder is equivalent to making the same calls in
//! the same order.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::routing::builder::{GroupAttributes, RouteTableBuilder};
use crate::routing::error::BuildError;
use crate::routing::handler::{HandlerRef, HandlerResolver};
use crate::routing::method::Verb;
use crate::routing::table::RouteTable;

/// Errors raised while turning declarations into a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("handler `{0}` is not of the form Controller@action")]
    InvalidHandler(String),

    #[error("route `{0}` declares no methods")]
    NoMethods(String),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Root of a route file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteFile {
    pub items: Vec<Declaration>,
}

/// One or several verbs.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Methods {
    One(Verb),
    Many(Vec<Verb>),
}

impl Methods {
    fn to_vec(&self) -> Vec<Verb> {
        match self {
            Methods::One(v) => vec![*v],
            Methods::Many(vs) => vs.clone(),
        }
    }
}

/// A single declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Route {
        method: Methods,
        path: String,
        handler: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        middleware: Vec<String>,
    },
    Resource(ResourceDeclaration),
    ApiResource(ResourceDeclaration),
    Group {
        #[serde(default)]
        prefix: Option<String>,
        #[serde(default)]
        middleware: Vec<String>,
        #[serde(default)]
        namespace: Option<String>,
        #[serde(default, rename = "as")]
        name_prefix: Option<String>,
        #[serde(default)]
        items: Vec<Declaration>,
    },
}

/// Fields shared by `resource` and `api_resource`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDeclaration {
    pub name: String,
    pub controller: String,
    #[serde(default)]
    pub only: Option<Vec<String>>,
    #[serde(default)]
    pub except: Vec<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    #[serde(default)]
    pub middleware: Vec<String>,
}

impl RouteFile {
    /// Parse a route file from TOML.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Replay the declarations onto `builder`.
    pub fn apply(&self, builder: &mut RouteTableBuilder) -> Result<(), DeclarationError> {
        apply_all(&self.items, builder)
    }

    /// Build a table from this file alone.
    pub fn build<R>(&self, resolver: &R) -> Result<RouteTable, DeclarationError>
    where
        R: HandlerResolver + ?Sized,
    {
        let mut builder = RouteTableBuilder::new();
        self.apply(&mut builder)?;
        Ok(builder.build(resolver)?)
    }
}

fn apply_all(items: &[Declaration], builder: &mut RouteTableBuilder) -> Result<(), DeclarationError> {
    items.iter().try_for_each(|item| item.apply(builder))
}

impl Declaration {
    fn apply(&self, builder: &mut RouteTableBuilder) -> Result<(), DeclarationError> {
        match self {
            Declaration::Route {
                method,
                path,
                handler,
                name,
                middleware,
            } => {
                let methods = method.to_vec();
                if methods.is_empty() {
                    return Err(DeclarationError::NoMethods(path.clone()));
                }
                let handler = HandlerRef::parse(handler)
                    .ok_or_else(|| DeclarationError::InvalidHandler(handler.clone()))?;

                let route = builder
                    .match_methods(&methods, path, handler)
                    .middleware(middleware.iter().cloned());
                if let Some(name) = name {
                    route.name(name.clone());
                }
                Ok(())
            }
            Declaration::Resource(res) => {
                res.apply(builder, false);
                Ok(())
            }
            Declaration::ApiResource(res) => {
                res.apply(builder, true);
                Ok(())
            }
            Declaration::Group {
                prefix,
                middleware,
                namespace,
                name_prefix,
                items,
            } => {
                let attrs = GroupAttributes {
                    prefix: prefix.clone(),
                    middleware: middleware.clone(),
                    namespace: namespace.clone(),
                    name_prefix: name_prefix.clone(),
                };
                let mut result = Ok(());
                builder.group(attrs, |b| result = apply_all(items, b));
                result
            }
        }
    }
}

impl ResourceDeclaration {
    fn apply(&self, builder: &mut RouteTableBuilder, api: bool) {
        let handle = if api {
            builder.api_resource(&self.name, &self.controller)
        } else {
            builder.resource(&self.name, &self.controller)
        };

        let handle = handle
            .except(self.except.iter().cloned())
            .parameters(self.parameters.clone())
            .names(self.names.clone())
            .middleware(self.middleware.iter().cloned());
        if let Some(only) = &self.only {
            handle.only(only.iter().cloned());
        }
    }
}
