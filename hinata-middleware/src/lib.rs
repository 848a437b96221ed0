//! hinata-middleware
//!
//! Wrappers around a [`Fetcher`](hinata_core::Fetcher) and the series cache
//! that sits in front of them.
//!
//! - [`SeriesCache`]: TTL store of normalized series, keyed by `SeriesKey`.
//! - [`RetryingFetcher`] / [`RetryMiddleware`]: bounded retries of transient
//!   provider failures.
//! - [`FetcherBuilder`]: composes a raw fetcher with middleware layers.

pub mod builder;
mod cache;
mod retry;

pub use crate::builder::FetcherBuilder;
pub use crate::cache::{CacheEntryInfo, CacheLookup, SeriesCache};
pub use crate::retry::{RetryMiddleware, RetryingFetcher, jitter_wait};
