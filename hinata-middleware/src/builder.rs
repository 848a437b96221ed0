//! Builder for composing fetchers with middleware layers.
//!
//! # Middleware Ordering Convention
//!
//! Middleware layers form an "onion" around the raw fetcher:
//!
//! ```text
//! Orchestrator
//!     ↓
//! Outermost Middleware (first to see the request, last to see the error)
//!     ↓
//! Inner Middleware
//!     ↓
//! Raw Fetcher (e.g., Yahoo - makes actual API calls)
//! ```
//!
//! The `layers` vector stores middleware in **outermost-first** order (last
//! added = outermost) and applies them in reverse during `build()`.

use std::sync::Arc;

use hinata_core::{Fetcher, Middleware};
use hinata_types::RetryConfig;

use crate::retry::RetryMiddleware;

const RETRY: &str = "RetryMiddleware";

/// Middleware builder for composing a fetcher with layered wrappers.
///
/// See [module-level documentation](self) for details on ordering.
pub struct FetcherBuilder {
    raw: Arc<dyn Fetcher>,
    /// Middleware layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
}

impl FetcherBuilder {
    /// Start from a raw, unwrapped fetcher.
    #[must_use]
    pub fn new(raw: Arc<dyn Fetcher>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the retry layer.
    ///
    /// The retry layer is placed outermost so it re-drives every inner layer.
    #[must_use]
    pub fn with_retry(mut self, cfg: RetryConfig) -> Self {
        self.layers.retain(|m| m.name() != RETRY);
        self.layers.insert(0, Box::new(RetryMiddleware::new(cfg)));
        self
    }

    /// Remove the retry layer if present.
    #[must_use]
    pub fn without_retry(mut self) -> Self {
        self.layers.retain(|m| m.name() != RETRY);
        self
    }

    /// Add an arbitrary middleware layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Layer names, outermost first.
    #[must_use]
    pub fn layers(&self) -> Vec<&'static str> {
        self.layers.iter().map(|m| m.name()).collect()
    }

    /// Build the wrapped fetcher, applying layers innermost first.
    #[must_use]
    pub fn build(self) -> Arc<dyn Fetcher> {
        let mut acc: Arc<dyn Fetcher> = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        acc
    }
}
