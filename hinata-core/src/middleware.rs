//! Middleware trait for wrapping `Fetcher` implementations.

use std::sync::Arc;

use crate::fetcher::Fetcher;

/// Trait implemented by fetcher middleware layers.
///
/// A middleware consumes an inner `Fetcher` and returns a wrapped fetcher that
/// augments its behavior (e.g., retries with backoff).
pub trait Middleware: Send + Sync {
    /// Apply this middleware to wrap an inner fetcher and return the wrapped fetcher.
    fn apply(self: Box<Self>, inner: Arc<dyn Fetcher>) -> Arc<dyn Fetcher>;

    /// Human-readable middleware name for introspection/logging.
    fn name(&self) -> &'static str;
}
