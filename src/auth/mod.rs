use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::ServiceError;

/// Static admin credential guard for the analytics endpoints
pub struct AdminAuth {
    token: Option<String>,
}

impl AdminAuth {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Check the caller-supplied credential against the configured one.
    /// With no credential configured every caller is rejected.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), ServiceError> {
        let Some(expected) = self.token.as_deref() else {
            return Err(ServiceError::AdminNotConfigured);
        };

        match supplied_token(headers) {
            Some(token) if token == expected => Ok(()),
            _ => Err(ServiceError::Unauthorized),
        }
    }
}

/// Credential from `x-admin-token`, or the token part of `Authorization`
fn supplied_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(token) = headers.get("x-admin-token").and_then(|h| h.to_str().ok()) {
        return Some(token);
    }

    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split_whitespace().nth(1))
}

pub async fn admin_middleware(
    auth: Arc<AdminAuth>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    match auth.authorize(&headers) {
        Ok(()) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}
