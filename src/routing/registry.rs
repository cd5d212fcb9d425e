//! Service registry.
//!
//! # Responsibilities
//! - Map a category key to the base addresses of its backend instances
//! - Resolve a category or report an explicit miss
//!
//! # Design Decisions
//! - Immutable after construction (shared via `Arc`, no locks)
//! - A category is either absent or has at least one endpoint
//! - Endpoint order is preserved from the config file

use std::collections::{BTreeMap, HashMap};

/// Static category → endpoints table.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Vec<String>>,
}

impl ServiceRegistry {
    /// Build a registry from `(category, endpoints)` pairs.
    ///
    /// Categories with no endpoints are dropped so that lookups never yield an
    /// empty list. Trailing slashes on endpoints are trimmed.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut services = HashMap::new();

        for (category, endpoints) in entries {
            let endpoints: Vec<String> = endpoints
                .into_iter()
                .map(|e| e.trim_end_matches('/').to_string())
                .collect();

            if endpoints.is_empty() {
                tracing::warn!(category = %category, "Skipping category with no endpoints");
                continue;
            }
            services.insert(category, endpoints);
        }

        Self { services }
    }

    /// Build a registry from the `[registry]` config table.
    pub fn from_config(table: &BTreeMap<String, Vec<String>>) -> Self {
        Self::new(table.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    /// Look up the endpoints serving `category`.
    pub fn resolve(&self, category: &str) -> Option<&[String]> {
        self.services.get(category).map(Vec::as_slice)
    }

    /// Registered category keys, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.services.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
