//! Uniform random load balancing strategy.

use rand::seq::SliceRandom;

use crate::load_balancer::LoadBalancer;

/// Random selector.
/// Draws from the calling thread's RNG, so concurrent dispatches never share
/// generator state.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomChoice;

impl RandomChoice {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for RandomChoice {
    fn select<'a>(&self, endpoints: &'a [String]) -> Option<&'a str> {
        endpoints.choose(&mut rand::thread_rng()).map(String::as_str)
    }
}
