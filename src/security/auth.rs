//! Auth gate.
//!
//! Presence-only check: a guarded request is let through when it carries an
//! `Authorization` header, whatever its value. Nothing is validated.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::AuthConfig;
use crate::http::error::GatewayError;
use crate::observability::metrics;

/// Outcome of the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny,
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    bypass_paths: HashSet<String>,
}

impl AuthGate {
    pub fn new<I, P>(bypass_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            bypass_paths: bypass_paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.bypass_paths.iter().cloned())
    }

    /// Exact path match against the bypass set.
    pub fn is_bypassed(&self, path: &str) -> bool {
        self.bypass_paths.contains(path)
    }

    pub fn decide(&self, path: &str, headers: &HeaderMap) -> AuthDecision {
        if self.is_bypassed(path) || headers.contains_key(header::AUTHORIZATION) {
            AuthDecision::Allow
        } else {
            AuthDecision::Deny
        }
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new(["/health"])
    }
}

/// Middleware running the gate ahead of every route.
pub async fn auth_middleware(
    State(gate): State<Arc<AuthGate>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    match gate.decide(request.uri().path(), request.headers()) {
        AuthDecision::Allow => next.run(request).await,
        AuthDecision::Deny => reject(request.method(), request.uri().path(), start),
    }
}

/// 401 for a request the gate turned away. Counted under the
/// `unregistered` category since it never reached dispatch.
fn reject(method: &Method, path: &str, start: Instant) -> Response {
    tracing::debug!(method = %method, path = %path, "Rejected request without credential");

    let response = GatewayError::Unauthorized.into_response();
    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        metrics::UNREGISTERED,
        start,
    );
    response
}
