//! Error responses.
//!
//! Every error the dispatcher produces itself is a small JSON body
//! `{"error": "..."}` with the matching status code.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::routing::Verb;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// A JSON error response.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

/// 404 for paths no route matches.
pub fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "No matching route found")
}

/// 405 with an `Allow` header listing the registered verbs.
pub fn method_not_allowed(allowed: &[Verb]) -> Response {
    let mut verbs: Vec<&str> = allowed.iter().map(Verb::as_str).collect();
    if allowed.contains(&Verb::Get) {
        verbs.insert(1, "HEAD");
    }

    let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    if let Ok(value) = HeaderValue::from_str(&verbs.join(", ")) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}
