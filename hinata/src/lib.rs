//! HINATA serves chart-ready OHLCV series.
//!
//! Overview
//! - Clamps the requested period to what providers accept for the timeframe.
//! - Answers from a TTL cache when a fresh entry exists.
//! - Otherwise fetches through a single [`Fetcher`], normalizes the provider
//!   payload into the canonical candle schema and, when the provider does not
//!   serve the timeframe natively, resamples a finer one (`4h` from `1h`).
//! - Writes the result to the cache only after every step succeeded.
//!
//! Key behaviors and trade-offs
//! - Cache TTLs follow timeframe granularity: minute bars expire after a
//!   minute, monthly bars after hours. Stale entries are dropped on lookup.
//! - Malformed rows are dropped and counted in [`HistoryReport::warnings`]
//!   instead of failing the request.
//! - Concurrent identical requests fetch independently unless
//!   `coalesce_in_flight` is enabled, which serializes them per key so the
//!   second one is served from the cache.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use hinata::{AssetClass, Hinata, Period, SeriesRequest, Timeframe};
//! use hinata_yahoo::YahooFetcher;
//!
//! let yahoo = YahooFetcher::builder()?.build();
//! let hinata = Hinata::builder().with_fetcher(yahoo).build()?;
//!
//! let req = SeriesRequest::new("AAPL", AssetClass::Equity, Timeframe::D1, Period::Y1);
//! let report = hinata.history(&req).await?;
//! println!("{} candles from {:?}", report.series.len(), report.source);
//! ```
//!
//! See `demos/examples/` in the repository for runnable end-to-end demonstrations.
#![warn(missing_docs)]

mod core;
mod history;
mod queries;

pub use crate::core::{Hinata, HinataBuilder};
pub use crate::history::{HistoryReport, SeriesRequest, Source, adjust_period};

pub use hinata_middleware::{CacheEntryInfo, CacheLookup, FetcherBuilder, SeriesCache};

// Re-export core types for convenience
pub use hinata_core::{
    AssetClass, BackoffConfig, CacheConfig, Candle, ChartOverlay, FetchCause, FetchError,
    FetchRequest, Fetcher, HinataConfig, HinataError, NormalizeReport, Period, RawPayload,
    ResampleError, RetryConfig, Series, SeriesKey, SymbolCatalog, Timeframe, ValidationError,
};
