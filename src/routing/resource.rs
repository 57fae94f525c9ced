//! Resourceful route expansion.
//!
//! A resource name expands to the conventional CRUD actions through a fixed
//! table of (action, verbs, path suffix). Options filter the table and
//! rename the parameter and route names of the survivors.
//!
//! | Action  | Verbs      | Path                  |
//! |---------|------------|-----------------------|
//! | index   | GET        | `/{name}`             |
//! | create  | GET        | `/{name}/create`      |
//! | store   | POST       | `/{name}`             |
//! | show    | GET        | `/{name}/{param}`     |
//! | edit    | GET        | `/{name}/{param}/edit`|
//! | update  | PUT, PATCH | `/{name}/{param}`     |
//! | destroy | DELETE     | `/{name}/{param}`     |

use std::collections::BTreeMap;

use crate::routing::method::Verb;

/// One of the conventional resource actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceAction {
    Index,
    Create,
    Store,
    Show,
    Edit,
    Update,
    Destroy,
}

impl ResourceAction {
    /// Expansion order.
    pub const ALL: [ResourceAction; 7] = [
        ResourceAction::Index,
        ResourceAction::Create,
        ResourceAction::Store,
        ResourceAction::Show,
        ResourceAction::Edit,
        ResourceAction::Update,
        ResourceAction::Destroy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceAction::Index => "index",
            ResourceAction::Create => "create",
            ResourceAction::Store => "store",
            ResourceAction::Show => "show",
            ResourceAction::Edit => "edit",
            ResourceAction::Update => "update",
            ResourceAction::Destroy => "destroy",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }

    pub fn verbs(&self) -> &'static [Verb] {
        match self {
            ResourceAction::Index | ResourceAction::Create | ResourceAction::Show | ResourceAction::Edit => {
                &[Verb::Get]
            }
            ResourceAction::Store => &[Verb::Post],
            ResourceAction::Update => &[Verb::Put, Verb::Patch],
            ResourceAction::Destroy => &[Verb::Delete],
        }
    }

    /// Path relative to the enclosing group.
    fn local_path(&self, resource: &str, param: &str) -> String {
        match self {
            ResourceAction::Index | ResourceAction::Store => resource.to_string(),
            ResourceAction::Create => format!("{}/create", resource),
            ResourceAction::Show | ResourceAction::Update | ResourceAction::Destroy => {
                format!("{}/{{{}}}", resource, param)
            }
            ResourceAction::Edit => format!("{}/{{{}}}/edit", resource, param),
        }
    }

    /// Actions without the create/edit form pages.
    fn is_api(&self) -> bool {
        !matches!(self, ResourceAction::Create | ResourceAction::Edit)
    }
}

/// Options applied to one resource registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOptions {
    /// Keep only these actions. Unknown names are ignored.
    pub only: Option<Vec<String>>,
    /// Drop these actions. Unknown names are ignored.
    pub except: Vec<String>,
    /// Parameter name overrides keyed by resource name.
    pub parameters: BTreeMap<String, String>,
    /// Route name overrides keyed by action.
    pub names: BTreeMap<String, String>,
    /// Expand without the create/edit actions.
    pub api: bool,
}

/// A single route produced by expanding a resource, before group scoping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedRoute {
    pub action: ResourceAction,
    pub local_path: String,
    pub name: String,
}

/// Expand `resource` into its routes.
///
/// Filtering happens before renaming, so `except` and `parameters` never
/// interact.
pub fn expand(resource: &str, options: &ResourceOptions) -> Vec<ExpandedRoute> {
    let resource = resource.trim_matches('/');
    let param = parameter_name(resource, options);

    ResourceAction::ALL
        .into_iter()
        .filter(|action| !options.api || action.is_api())
        .filter(|action| match &options.only {
            Some(only) => only.iter().any(|a| a == action.as_str()),
            None => true,
        })
        .filter(|action| !options.except.iter().any(|a| a == action.as_str()))
        .map(|action| ExpandedRoute {
            action,
            local_path: action.local_path(resource, &param),
            name: options
                .names
                .get(action.as_str())
                .cloned()
                .unwrap_or_else(|| format!("{}.{}", resource.replace('/', "."), action.as_str())),
        })
        .collect()
}

/// The placeholder name for a resource's member routes.
///
/// Overrides are looked up by resource name first, then by the default
/// singular.
pub fn parameter_name(resource: &str, options: &ResourceOptions) -> String {
    let last = resource.rsplit('/').next().unwrap_or(resource);
    let default = singular(last).replace('-', "_");
    options
        .parameters
        .get(resource)
        .or_else(|| options.parameters.get(&default))
        .cloned()
        .unwrap_or(default)
}

/// Naive English singular for resource names.
pub fn singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{}y", stem);
        }
    }
    for suffix in ["sses", "xes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() && !stem.ends_with('s') => stem.to_string(),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(routes: &[ExpandedRoute]) -> Vec<&str> {
        routes.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_singular() {
        assert_eq!(singular("days"), "day");
        assert_eq!(singular("categories"), "category");
        assert_eq!(singular("boxes"), "box");
        assert_eq!(singular("addresses"), "address");
        assert_eq!(singular("class"), "class");
    }

    #[test]
    fn test_full_expansion_order() {
        let routes = expand("days", &ResourceOptions::default());
        assert_eq!(
            names(&routes),
            vec![
                "days.index",
                "days.create",
                "days.store",
                "days.show",
                "days.edit",
                "days.update",
                "days.destroy"
            ]
        );
        assert_eq!(routes[4].local_path, "days/{day}/edit");
    }

    #[test]
    fn test_except_ignores_unknown_actions() {
        let options = ResourceOptions {
            except: vec!["show".into(), "archive".into()],
            ..Default::default()
        };
        assert_eq!(expand("days", &options).len(), 6);
    }

    #[test]
    fn test_only_and_api() {
        let options = ResourceOptions {
            only: Some(vec!["index".into(), "show".into(), "bogus".into()]),
            ..Default::default()
        };
        assert_eq!(names(&expand("days", &options)), vec!["days.index", "days.show"]);

        let api = ResourceOptions {
            api: true,
            ..Default::default()
        };
        assert_eq!(expand("days", &api).len(), 5);
    }

    #[test]
    fn test_parameter_override_keeps_route_names() {
        let mut options = ResourceOptions::default();
        options.parameters.insert("days".into(), "entry".into());
        let routes = expand("days", &options);
        assert_eq!(routes[3].local_path, "days/{entry}");
        assert_eq!(routes[3].name, "days.show");
    }

    #[test]
    fn test_parameter_override_by_singular_key() {
        let mut options = ResourceOptions::default();
        options.parameters.insert("day".into(), "date".into());
        assert_eq!(parameter_name("days", &options), "date");
    }

    #[test]
    fn test_name_override() {
        let mut options = ResourceOptions::default();
        options.names.insert("index".into(), "calendar".into());
        let routes = expand("days", &options);
        assert_eq!(routes[0].name, "calendar");
        assert_eq!(routes[1].name, "days.create");
    }
}
