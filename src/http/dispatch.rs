//! Request dispatch.
//!
//! One inbound request becomes exactly one upstream attempt:
//! ```text
//! category → registry lookup (404 on miss)
//!          → load balancer (one endpoint)
//!          → target URL + forwarded headers
//!          → upstream call (504 on timeout, 502 on anything else)
//!          → relay status/headers/body, hop-by-hop stripped
//! ```
//! There is no retry and no fallback to another endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, response::Response};

use crate::http::client::{UpstreamClient, UpstreamError, UpstreamRequest, UpstreamResponse};
use crate::http::error::GatewayError;
use crate::http::request::InboundRequest;
use crate::load_balancer::{LoadBalancer, RandomChoice};
use crate::observability::metrics;
use crate::routing::{target::upstream_url, ServiceRegistry};
use crate::security::headers::{forward_headers, request_id, strip_hop_by_hop};

/// Routes requests for a category to one of its endpoints.
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ServiceRegistry>,
    balancer: Arc<dyn LoadBalancer>,
    client: Arc<dyn UpstreamClient>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<ServiceRegistry>,
        client: Arc<dyn UpstreamClient>,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            balancer: Arc::new(RandomChoice::new()),
            client,
            timeout,
        }
    }

    /// Replace the endpoint selection strategy.
    pub fn with_balancer(mut self, balancer: Arc<dyn LoadBalancer>) -> Self {
        self.balancer = balancer;
        self
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn client(&self) -> &Arc<dyn UpstreamClient> {
        &self.client
    }

    /// Dispatch one request for `category`.
    pub async fn dispatch(
        &self,
        category: &str,
        request: InboundRequest,
    ) -> Result<Response, GatewayError> {
        let endpoints = self
            .registry
            .resolve(category)
            .ok_or_else(|| GatewayError::CategoryNotFound(category.to_string()))?;

        // Registry never stores an empty list.
        let endpoint = self
            .balancer
            .select(endpoints)
            .ok_or_else(|| GatewayError::CategoryNotFound(category.to_string()))?;

        let url = upstream_url(endpoint, category, &request.sub_path, request.query.as_deref());
        let headers = forward_headers(&request.headers, request.client_ip);
        let request_id = request_id(&headers).to_string();

        tracing::debug!(
            request_id = %request_id,
            category = %category,
            endpoint = %endpoint,
            method = %request.method,
            url = %url,
            "Forwarding request"
        );

        let outbound = UpstreamRequest {
            method: request.method,
            url,
            headers,
            body: request.body,
        };

        match self.client.call(outbound, self.timeout).await {
            Ok(upstream) => {
                tracing::debug!(
                    request_id = %request_id,
                    endpoint = %endpoint,
                    status = %upstream.status,
                    "Upstream responded"
                );
                Ok(relay(upstream))
            }
            Err(UpstreamError::Timeout) => {
                tracing::warn!(
                    request_id = %request_id,
                    endpoint = %endpoint,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Upstream timed out"
                );
                metrics::record_upstream_error(category, "timeout");
                Err(GatewayError::UpstreamTimeout)
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    endpoint = %endpoint,
                    error = %e,
                    "Upstream error"
                );
                metrics::record_upstream_error(category, "unavailable");
                Err(GatewayError::UpstreamUnavailable)
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("categories", &self.registry.categories())
            .field("balancer", &self.balancer)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Turn the buffered upstream answer into the caller's response.
///
/// Content-Type comes across with the other end-to-end headers.
fn relay(upstream: UpstreamResponse) -> Response {
    let UpstreamResponse {
        status,
        mut headers,
        body,
    } = upstream;
    strip_hop_by_hop(&mut headers);

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
