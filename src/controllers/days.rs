//! The `days` resource.
//!
//! `alert` shares its path with `destroy` but answers GET: it is the
//! confirmation step shown before a day is deleted.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::controllers::ActionResponse;
use crate::http::RouteRequest;

fn respond(status: StatusCode, req: &RouteRequest) -> Response {
    (status, Json(ActionResponse::from(req))).into_response()
}

pub async fn index(req: RouteRequest) -> Response {
    respond(StatusCode::OK, &req)
}

pub async fn create(req: RouteRequest) -> Response {
    respond(StatusCode::OK, &req)
}

pub async fn store(req: RouteRequest) -> Response {
    respond(StatusCode::CREATED, &req)
}

pub async fn edit(req: RouteRequest) -> Response {
    respond(StatusCode::OK, &req)
}

pub async fn update(req: RouteRequest) -> Response {
    respond(StatusCode::OK, &req)
}

pub async fn destroy(req: RouteRequest) -> Response {
    respond(StatusCode::OK, &req)
}

#[derive(Serialize)]
struct Confirmation {
    confirm: String,
    #[serde(flatten)]
    action: ActionResponse,
}

/// Confirmation prompt before deleting a day.
pub async fn alert(req: RouteRequest) -> Response {
    let day = req.param("day").unwrap_or_default();
    Json(Confirmation {
        confirm: format!("Delete day {}?", day),
        action: ActionResponse::from(&req),
    })
    .into_response()
}
