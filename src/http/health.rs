//! Liveness probe.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
}

/// Always 200; never touches the registry or upstreams.
pub async fn health_check() -> Json<Liveness> {
    Json(Liveness { status: "ok" })
}
