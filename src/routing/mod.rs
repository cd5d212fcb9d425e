//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! /items/{category}/{rest}
//!     → registry.rs (category → endpoint list, or explicit miss)
//!     → [load balancer picks one endpoint]
//!     → target.rs (endpoint + category + rest + query → upstream URL)
//! ```
//!
//! # Design Decisions
//! - Registry built at startup, immutable at runtime
//! - Unknown categories fail loudly; there is no default backend
//! - Deterministic: same category always resolves to the same list

pub mod registry;
pub mod target;

pub use registry::ServiceRegistry;
