//! Admin area guard.
//!
//! Requires `Authorization: Bearer <admin.api_key>`.

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::response::Response;

use crate::http::middleware::Middleware;
use crate::http::response::error_response;

/// Context attached to requests that passed the guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminContext;

#[derive(Debug, Clone)]
pub struct AdminGuard {
    expected: String,
}

impl AdminGuard {
    pub fn new(api_key: &str) -> Self {
        Self {
            expected: format!("Bearer {}", api_key),
        }
    }
}

impl Middleware for AdminGuard {
    fn handle(&self, request: &mut Request<Body>) -> Result<(), Response> {
        let authorized = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|value| value == self.expected);

        if !authorized {
            tracing::warn!(path = %request.uri().path(), "Admin authorization failed");
            let mut response = error_response(StatusCode::UNAUTHORIZED, "Admin authorization required");
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            return Err(response);
        }

        request.extensions_mut().insert(AdminContext);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/admin/days");
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_accepts_matching_key() {
        let guard = AdminGuard::new("secret");
        let mut req = request(Some("Bearer secret"));
        assert!(guard.handle(&mut req).is_ok());
        assert_eq!(req.extensions().get::<AdminContext>(), Some(&AdminContext));
    }

    #[test]
    fn test_rejects_missing_or_wrong_key() {
        let guard = AdminGuard::new("secret");
        for auth in [None, Some("Bearer nope"), Some("secret")] {
            let err = guard.handle(&mut request(auth)).unwrap_err();
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.headers()[header::WWW_AUTHENTICATE], "Bearer");
        }
    }
}
