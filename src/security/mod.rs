//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → auth.rs (credential presence, bypass list)
//!     → [dispatcher]
//!     → headers.rs (sanitize, add X-Request-ID / X-Forwarded-For)
//!     → Upstream
//! Upstream response:
//!     → headers.rs (strip hop-by-hop)
//!     → Client
//! ```
//!
//! # Design Decisions
//! - Gate decides before any upstream work happens
//! - Hop-by-hop headers never cross the gateway in either direction

pub mod auth;
pub mod headers;

pub use auth::{auth_middleware, AuthDecision, AuthGate};
