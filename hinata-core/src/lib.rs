//! hinata-core
//!
//! Core types, traits, and utilities shared across the HINATA crates.
//!
//! - `types`: the canonical candle schema, raw provider payloads and requests.
//! - `fetcher`: the `Fetcher` trait every data source implements.
//! - `middleware`: the `Middleware` trait used to wrap fetchers.
//! - `timeseries`: normalization of provider payloads and resampling.
//!
//! Async runtime (Tokio)
//! ---------------------
//! `Fetcher` is an `async_trait`; the crates built on it (cache, retry,
//! orchestrator) use Tokio synchronization and timers, so callers must run
//! under a Tokio 1.x runtime.
//!
#![warn(missing_docs)]

/// The `Fetcher` trait implemented by data sources.
pub mod fetcher;
/// Middleware trait implemented by fetcher wrappers.
pub mod middleware;
/// Normalization and resampling of candle series.
pub mod timeseries;
pub mod types;

pub use fetcher::Fetcher;
pub use middleware::Middleware;
pub use timeseries::fieldmap::{FieldMap, VolumeField, field_map};
pub use timeseries::normalize::{NormalizeOptions, Normalized, normalize, normalize_with};
pub use timeseries::resample::{check_compatible, resample, resample_in};
pub use types::*;
