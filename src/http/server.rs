//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the items and health routes
//! - Wire up middleware (tracing, auth gate, body limit)
//! - Hand matched requests to the dispatcher
//! - Serve until shutdown, then drain the upstream client

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderMap, Method, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::client::{HyperUpstream, UpstreamClient};
use crate::http::dispatch::Dispatcher;
use crate::http::error::GatewayError;
use crate::http::health::health_check;
use crate::http::request::{ClientAddr, InboundRequest};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::{target::raw_sub_path, ServiceRegistry};
use crate::security::{auth_middleware, AuthGate};

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    dispatcher: Dispatcher,
}

impl GatewayServer {
    /// Create a server with a pooled hyper client sized from the config.
    pub fn new(config: GatewayConfig) -> Self {
        let client = Arc::new(HyperUpstream::new(&config.upstream));
        Self::with_client(config, client)
    }

    /// Create a server around an existing upstream client.
    pub fn with_client(config: GatewayConfig, client: Arc<dyn UpstreamClient>) -> Self {
        let registry = Arc::new(ServiceRegistry::from_config(&config.registry));
        let dispatcher = Dispatcher::new(
            registry,
            client,
            Duration::from_secs(config.upstream.timeout_secs),
        );
        Self::with_dispatcher(config, dispatcher)
    }

    pub fn with_dispatcher(config: GatewayConfig, dispatcher: Dispatcher) -> Self {
        let gate = Arc::new(AuthGate::from_config(&config.auth));
        let router = build_router(dispatcher.clone(), gate, config.listener.max_body_bytes);

        tracing::info!(
            categories = ?dispatcher.registry().categories(),
            timeout_secs = config.upstream.timeout_secs,
            "Gateway configured"
        );

        Self {
            router,
            config,
            dispatcher,
        }
    }

    /// The assembled router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain upstream calls.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("HTTP server shutting down");
            })
            .await?;

        let grace = Duration::from_secs(self.config.upstream.drain_timeout_secs);
        self.dispatcher.client().drain(grace).await;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(dispatcher: Dispatcher, gate: Arc<AuthGate>, max_body_bytes: usize) -> Router {
    let items = || -> MethodRouter<AppState> {
        get(items_handler)
            .post(items_handler)
            .put(items_handler)
            .delete(items_handler)
            .patch(items_handler)
    };

    Router::new()
        .route("/items/{category}", items())
        .route("/items/{category}/", items())
        .route("/items/{category}/{*rest}", items())
        .route("/health", get(health_check))
        .with_state(AppState { dispatcher })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(gate, auth_middleware))
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        )
}

#[derive(Debug, Deserialize)]
struct ItemPath {
    category: String,
}

/// Entry point of the dispatch pipeline (auth already passed).
async fn items_handler(
    State(state): State<AppState>,
    Path(ItemPath { category }): Path<ItemPath>,
    ClientAddr(client_ip): ClientAddr,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let method_label = method.to_string();

    let request = InboundRequest {
        method,
        sub_path: raw_sub_path(uri.path()).to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
        client_ip,
    };

    let result = state.dispatcher.dispatch(&category, request).await;

    let category_label = match &result {
        Err(GatewayError::CategoryNotFound(_)) => metrics::UNREGISTERED,
        _ => category.as_str(),
    };
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(category = %category, status = %err.status_code(), "Dispatch rejected");
            err.into_response()
        }
    };

    metrics::record_request(&method_label, response.status().as_u16(), category_label, start);
    response
}
