//! Controllers for the administrative backend.
//!
//! Each action answers with a JSON description of the route it was reached
//! through. Business logic lives outside this service.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::http::{HandlerRegistry, RouteRequest};
use crate::routes::BACK_NAMESPACE;

pub mod admin;
pub mod days;

/// Body returned by every action.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub route: Option<String>,
    pub handler: String,
    pub params: BTreeMap<String, String>,
}

impl From<&RouteRequest> for ActionResponse {
    fn from(req: &RouteRequest) -> Self {
        Self {
            route: req.name.clone(),
            handler: req.handler.to_string(),
            params: req.params.iter().cloned().collect(),
        }
    }
}

fn qualified(controller: &str) -> String {
    format!("{}\\{}", BACK_NAMESPACE, controller)
}

/// Handlers for every admin route.
pub fn registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register(&qualified("AdminController"), "index", admin::index);

    let controller = qualified("DaysController");
    registry
        .register(&controller, "index", days::index)
        .register(&controller, "create", days::create)
        .register(&controller, "store", days::store)
        .register(&controller, "edit", days::edit)
        .register(&controller, "update", days::update)
        .register(&controller, "destroy", days::destroy)
        .register(&controller, "alert", days::alert);

    registry
}
