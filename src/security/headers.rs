//! Header forwarding and hop-by-hop stripping.
//!
//! # Responsibilities
//! - Build the outbound header set for an upstream call
//! - Guarantee exactly one X-Request-ID per outbound request
//! - Carry the client address in X-Forwarded-For
//! - Strip hop-by-hop headers in both directions
//!
//! # Precedence
//! ```text
//! 1. Authorization      inbound value, if any
//! 2. X-Request-ID       inbound value, else fresh UUID v4
//! 3. X-Forwarded-For    inbound value, else remote client IP
//! 4. Content-Type       inbound value, else application/json
//! 5. everything else    minus keys above and hop-by-hop headers
//! ```
//! `HeaderName` is always lowercase, so every comparison here is
//! case-insensitive.

use std::net::IpAddr;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Media type assumed when the caller sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Headers that only describe a single connection leg.
pub const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Build the header set sent upstream.
pub fn forward_headers(inbound: &HeaderMap, client_ip: Option<IpAddr>) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len() + 3);

    if let Some(credential) = inbound.get(header::AUTHORIZATION) {
        outbound.insert(header::AUTHORIZATION, credential.clone());
    }

    let request_id = inbound
        .get(&X_REQUEST_ID)
        .cloned()
        .unwrap_or_else(generate_request_id);
    outbound.insert(X_REQUEST_ID, request_id);

    let forwarded_for = inbound
        .get(&X_FORWARDED_FOR)
        .cloned()
        .or_else(|| client_ip.and_then(|ip| HeaderValue::try_from(ip.to_string()).ok()));
    if let Some(value) = forwarded_for {
        outbound.insert(X_FORWARDED_FOR, value);
    }

    let content_type = inbound
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    outbound.insert(header::CONTENT_TYPE, content_type);

    // keys() yields each name once; get_all() keeps repeated values.
    for name in inbound.keys() {
        if is_hop_by_hop(name) || outbound.contains_key(name) {
            continue;
        }
        for value in inbound.get_all(name) {
            outbound.append(name.clone(), value.clone());
        }
    }

    outbound
}

/// Remove hop-by-hop headers in place (used on upstream responses).
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(name);
    }
}

/// Fresh correlation token. Only uniqueness matters here.
pub fn generate_request_id() -> HeaderValue {
    HeaderValue::try_from(Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}

/// Request ID as a string for log fields.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
