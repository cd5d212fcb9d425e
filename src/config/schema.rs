//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from the TOML file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Outbound call settings.
    pub upstream: UpstreamConfig,

    /// Auth gate settings.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Category key -> ordered endpoint base addresses.
    pub registry: BTreeMap<String, Vec<String>>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            upstream: UpstreamConfig::default(),
            auth: AuthConfig::default(),
            observability: ObservabilityConfig::default(),
            registry: default_registry(),
        }
    }
}

/// Registry used when the config file has no `[registry]` section.
///
/// `movies` points at a placeholder service on purpose.
fn default_registry() -> BTreeMap<String, Vec<String>> {
    let cluster = |port: u16| {
        ["serverA", "serverB", "serverC"]
            .iter()
            .map(|instance| format!("http://localhost:{port}/{instance}"))
            .collect::<Vec<_>>()
    };

    BTreeMap::from([
        ("books".to_string(), cluster(8000)),
        ("movies".to_string(), cluster(8001)),
    ])
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest inbound body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Outbound call configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Deadline for one upstream exchange, in seconds.
    pub timeout_secs: u64,

    /// Maximum concurrent upstream calls.
    pub max_connections: u32,

    /// How long shutdown waits for in-flight calls, in seconds.
    pub drain_timeout_secs: u64,

    /// Largest upstream response body relayed, in bytes.
    pub max_response_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            max_connections: 100,
            drain_timeout_secs: 10,
            max_response_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Auth gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Paths served without a credential header.
    pub bypass_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bypass_paths: vec!["/health".to_string()],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub log_level: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
