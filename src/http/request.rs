//! Inbound request capture.
//!
//! # Responsibilities
//! - Extract the remote client address (when the server recorded one)
//! - Hold everything a dispatch needs from the caller's request
//!
//! # Design Decisions
//! - A missing peer address is not an error; X-Forwarded-For is simply not
//!   synthesized
//! - Body is buffered bytes, forwarded upstream without re-encoding

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    body::Bytes,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap, Method},
};

/// Remote client IP, if the connection info is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAddr(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let addr = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(Self(addr))
    }
}

/// What the dispatcher needs from one caller request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Sub-path after `/items/{category}`, still percent-encoded, no leading slash.
    pub sub_path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub client_ip: Option<IpAddr>,
}

impl InboundRequest {
    /// Bare request with no sub-path, headers or body.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            sub_path: String::new(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            client_ip: None,
        }
    }
}
