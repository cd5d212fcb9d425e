//! Outbound HTTP call capability.
//!
//! # Responsibilities
//! - Issue one upstream request and buffer its response
//! - Enforce the per-call deadline (slot wait + exchange + body read)
//! - Bound concurrent upstream calls and the size of buffered bodies
//! - Drain in-flight calls on shutdown
//!
//! # Design Decisions
//! - The dispatcher only sees the `UpstreamClient` trait, so tests can swap
//!   in a stub and the process owns the real client's lifecycle
//! - Timeouts are reported distinctly from every other failure
//! - Error detail stays in `UpstreamError`; the dispatcher logs it and hands
//!   the caller a generic message

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::{self, Instant};

use crate::config::UpstreamConfig;

/// A fully built request ready to send upstream.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Buffered upstream answer.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Transport-level failure of one upstream call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream call timed out")]
    Timeout,

    #[error("upstream client is closed")]
    Closed,

    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),

    #[error("upstream request failed: {0}")]
    Request(String),

    #[error("failed to read upstream body: {0}")]
    Body(String),
}

pub type UpstreamFuture<'a> =
    Pin<Box<dyn Future<Output = Result<UpstreamResponse, UpstreamError>> + Send + 'a>>;

/// Capability to perform upstream calls.
pub trait UpstreamClient: Send + Sync + 'static {
    /// Send `request`, giving up after `timeout`.
    fn call(&self, request: UpstreamRequest, timeout: Duration) -> UpstreamFuture<'_>;

    /// Stop admitting calls and wait up to `grace` for in-flight ones.
    fn drain(&self, _grace: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async {})
    }
}

/// Pooled hyper client with a concurrency cap.
pub struct HyperUpstream {
    client: Client<HttpConnector, Body>,
    permits: Arc<Semaphore>,
    max_connections: u32,
    max_response_bytes: usize,
}

impl HyperUpstream {
    pub fn new(config: &UpstreamConfig) -> Self {
        let max_connections = config.max_connections.max(1);
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(max_connections as usize)
            .build(HttpConnector::new());

        Self {
            client,
            permits: Arc::new(Semaphore::new(max_connections as usize)),
            max_connections,
            max_response_bytes: config.max_response_bytes,
        }
    }

    /// Number of upstream calls currently holding a slot.
    pub fn in_flight(&self) -> usize {
        (self.max_connections as usize).saturating_sub(self.permits.available_permits())
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    async fn send(
        &self,
        request: UpstreamRequest,
        timeout: Duration,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let deadline = Instant::now() + timeout;

        let _permit = match time::timeout_at(deadline, self.permits.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(UpstreamError::Closed),
            Err(_) => return Err(UpstreamError::Timeout),
        };

        let mut builder = Request::builder().method(request.method).uri(&request.url);
        if let Some(headers) = builder.headers_mut() {
            *headers = request.headers;
        }
        let outbound = builder
            .body(Body::from(request.body))
            .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?;

        let exchange = async {
            let response = self
                .client
                .request(outbound)
                .await
                .map_err(|e| UpstreamError::Request(e.to_string()))?;

            let (parts, body) = response.into_parts();
            let body = axum::body::to_bytes(Body::new(body), self.max_response_bytes)
                .await
                .map_err(|e| UpstreamError::Body(e.to_string()))?;

            Ok(UpstreamResponse {
                status: parts.status,
                headers: parts.headers,
                body,
            })
        };

        time::timeout_at(deadline, exchange)
            .await
            .unwrap_or(Err(UpstreamError::Timeout))
    }

    async fn close(&self, grace: Duration) {
        let in_flight = self.in_flight();
        tracing::info!(in_flight, "Draining upstream client");

        // Semaphore is FIFO: taking every slot waits out the in-flight calls
        // and parks any newcomer behind us until close() fails it.
        match time::timeout(grace, self.permits.acquire_many(self.max_connections)).await {
            Ok(Ok(all)) => {
                self.permits.close();
                drop(all);
                tracing::info!("Upstream client drained");
            }
            Ok(Err(_)) => tracing::debug!("Upstream client already closed"),
            Err(_) => {
                self.permits.close();
                tracing::warn!(
                    in_flight = self.in_flight(),
                    grace_secs = grace.as_secs(),
                    "Drain deadline reached with upstream calls still running"
                );
            }
        }
    }
}

impl UpstreamClient for HyperUpstream {
    fn call(&self, request: UpstreamRequest, timeout: Duration) -> UpstreamFuture<'_> {
        Box::pin(self.send(request, timeout))
    }

    fn drain(&self, grace: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(self.close(grace))
    }
}
