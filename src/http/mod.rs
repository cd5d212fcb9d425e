//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, auth gate layer)
//!     → request.rs (client address, buffered body)
//!     → dispatch.rs (registry → load balancer → upstream call)
//!     → client.rs (pooled hyper client, deadline, concurrency cap)
//!     → error.rs (401/404/502/504 payloads)
//!     → Send to client
//! ```

pub mod client;
pub mod dispatch;
pub mod error;
pub mod health;
pub mod request;
pub mod server;

pub use client::{HyperUpstream, UpstreamClient, UpstreamError, UpstreamRequest, UpstreamResponse};
pub use dispatch::Dispatcher;
pub use error::GatewayError;
pub use request::InboundRequest;
pub use server::GatewayServer;
