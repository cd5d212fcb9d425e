//! Configuration validation.
//!
//! Serde handles syntax; this module checks the values make sense before the
//! config is accepted. Every problem is reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("upstream.max_connections must be greater than zero")]
    ZeroMaxConnections,

    #[error("upstream.max_response_bytes must be greater than zero")]
    ZeroResponseLimit,

    #[error("auth.bypass_paths entry '{0}' must start with '/'")]
    InvalidBypassPath(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("registry contains an empty category key")]
    EmptyCategory,

    #[error("registry category '{0}' must not contain '/'")]
    InvalidCategory(String),

    #[error("registry category '{0}' has no endpoints")]
    NoEndpoints(String),

    #[error("registry category '{category}' endpoint '{endpoint}' is not an absolute http URL")]
    InvalidEndpoint { category: String, endpoint: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.upstream.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }
    if config.upstream.max_response_bytes == 0 {
        errors.push(ValidationError::ZeroResponseLimit);
    }

    for path in &config.auth.bypass_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::InvalidBypassPath(path.clone()));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    for (category, endpoints) in &config.registry {
        if category.is_empty() {
            errors.push(ValidationError::EmptyCategory);
        } else if category.contains('/') {
            errors.push(ValidationError::InvalidCategory(category.clone()));
        }

        if endpoints.is_empty() {
            errors.push(ValidationError::NoEndpoints(category.clone()));
        }

        for endpoint in endpoints {
            if !is_http_base(endpoint) {
                errors.push(ValidationError::InvalidEndpoint {
                    category: category.clone(),
                    endpoint: endpoint.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The outbound connector only speaks plain HTTP.
fn is_http_base(endpoint: &str) -> bool {
    match Url::parse(endpoint) {
        Ok(url) => {
            url.scheme() == "http"
                && url.host_str().is_some()
                && url.query().is_none()
                && url.fragment().is_none()
        }
        Err(_) => false,
    }
}
