//! Shared HINATA vocabulary: asset classes, timeframes, periods, cache keys,
//! errors and configuration.
#![warn(missing_docs)]

mod asset_class;
mod config;
mod error;
mod key;
mod period;
mod reports;
mod timeframe;

pub use asset_class::AssetClass;
pub use config::{
    BackoffConfig, CacheConfig, ChartOverlay, HinataConfig, RetryConfig, SymbolCatalog,
};
pub use error::{
    FetchCause, FetchError, HinataError, ParseError, ResampleError, ValidationError,
};
pub use key::SeriesKey;
pub use period::Period;
pub use reports::NormalizeReport;
pub use timeframe::Timeframe;
