//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Category resolved → endpoint list
//!     → random.rs (uniform choice, fresh per request)
//!     → Return endpoint base address
//! ```
//!
//! # Design Decisions
//! - Selection is stateless: no counters, no affinity, no health tracking
//! - Strategy sits behind a trait so the dispatcher can be tested with a
//!   deterministic picker

pub mod random;

pub use random::RandomChoice;

/// Strategy for choosing one endpoint out of a category's list.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Returns `None` only when `endpoints` is empty.
    fn select<'a>(&self, endpoints: &'a [String]) -> Option<&'a str>;
}
