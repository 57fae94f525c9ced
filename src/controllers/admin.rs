use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::controllers::ActionResponse;
use crate::http::RouteRequest;

#[derive(Serialize)]
pub struct Dashboard {
    pub version: &'static str,
    pub status: &'static str,
    #[serde(flatten)]
    pub action: ActionResponse,
}

/// Admin landing page.
pub async fn index(req: RouteRequest) -> Response {
    Json(Dashboard {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        action: ActionResponse::from(&req),
    })
    .into_response()
}
