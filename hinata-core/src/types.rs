//! Canonical candle schema plus re-exports of the shared vocabulary.
// Consolidated re-exports so downstream crates can depend on `hinata-core` only

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use hinata_types::{
    AssetClass, BackoffConfig, CacheConfig, ChartOverlay, FetchCause, FetchError, HinataConfig,
    HinataError, NormalizeReport, ParseError, Period,
    ResampleError, RetryConfig, SeriesKey, SymbolCatalog, Timeframe, ValidationError,
};

/// One OHLCV record for a fixed time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start, always UTC.
    pub ts: DateTime<Utc>,
    /// First traded price in the bucket.
    pub open: f64,
    /// Highest traded price in the bucket.
    pub high: f64,
    /// Lowest traded price in the bucket.
    pub low: f64,
    /// Last traded price in the bucket.
    pub close: f64,
    /// Traded volume; zero when the venue does not report any.
    pub volume: f64,
}

/// Rule broken by a candle.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CandleFault {
    /// A price or the volume is NaN or infinite.
    #[error("non-finite value")]
    NonFinite,
    /// A price is zero or negative.
    #[error("non-positive price")]
    NonPositivePrice,
    /// Volume is negative.
    #[error("negative volume")]
    NegativeVolume,
    /// `high` is below `open` or `close`.
    #[error("high below open/close")]
    HighBelowBody,
    /// `low` is above `open` or `close`.
    #[error("low above open/close")]
    LowAboveBody,
}

impl Candle {
    /// Check `low <= min(open, close) <= max(open, close) <= high` and value sanity.
    ///
    /// # Errors
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), CandleFault> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().chain([&self.volume]).any(|v| !v.is_finite()) {
            return Err(CandleFault::NonFinite);
        }
        if prices.iter().any(|v| *v <= 0.0) {
            return Err(CandleFault::NonPositivePrice);
        }
        if self.volume < 0.0 {
            return Err(CandleFault::NegativeVolume);
        }
        if self.high < self.open.max(self.close) {
            return Err(CandleFault::HighBelowBody);
        }
        if self.low > self.open.min(self.close) {
            return Err(CandleFault::LowAboveBody);
        }
        Ok(())
    }

    /// True when [`validate`](Self::validate) passes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Ordered candles for one `(symbol, asset class, timeframe)`.
///
/// Timestamps are strictly increasing and every candle is valid. An empty
/// series is a legitimate value meaning "the provider had no data".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    asset_class: AssetClass,
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl Series {
    /// Build a series from candles that must already satisfy the invariants.
    ///
    /// # Errors
    /// Returns `ValidationError::InvariantViolation` naming the first bad index.
    pub fn new(
        symbol: impl Into<String>,
        asset_class: AssetClass,
        timeframe: Timeframe,
        candles: Vec<Candle>,
    ) -> Result<Self, ValidationError> {
        for (index, c) in candles.iter().enumerate() {
            if let Err(fault) = c.validate() {
                return Err(ValidationError::InvariantViolation {
                    index,
                    reason: fault.to_string(),
                });
            }
        }
        if let Some(index) = candles.windows(2).position(|w| w[0].ts >= w[1].ts) {
            return Err(ValidationError::InvariantViolation {
                index: index + 1,
                reason: "timestamps not strictly increasing".into(),
            });
        }
        Ok(Self::from_checked(symbol, asset_class, timeframe, candles))
    }

    /// Explicit empty series.
    pub fn empty(symbol: impl Into<String>, asset_class: AssetClass, timeframe: Timeframe) -> Self {
        Self::from_checked(symbol, asset_class, timeframe, Vec::new())
    }

    // Callers guarantee the invariants.
    pub(crate) fn from_checked(
        symbol: impl Into<String>,
        asset_class: AssetClass,
        timeframe: Timeframe,
        candles: Vec<Candle>,
    ) -> Self {
        debug_assert!(candles.windows(2).all(|w| w[0].ts < w[1].ts));
        Self {
            symbol: symbol.into(),
            asset_class,
            timeframe,
            candles,
        }
    }

    /// Symbol the series belongs to.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Asset class of the instrument.
    #[must_use]
    pub const fn asset_class(&self) -> AssetClass {
        self.asset_class
    }

    /// Candle width.
    #[must_use]
    pub const fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Candles, oldest first.
    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Consume the series and return its candles.
    #[must_use]
    pub fn into_candles(self) -> Vec<Candle> {
        self.candles
    }

    /// Number of candles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// True when the provider returned no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Oldest candle.
    #[must_use]
    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    /// Newest candle.
    #[must_use]
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Close of the newest candle.
    #[must_use]
    pub fn latest_close(&self) -> Option<f64> {
        self.last().map(|c| c.close)
    }
}

/// Timestamp exactly as a provider reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawTimestamp {
    /// Seconds since the Unix epoch; already an absolute instant.
    Epoch(i64),
    /// Wall-clock time in the provider's session timezone.
    Local(NaiveDateTime),
}

/// Provider-native, columnar time-series payload.
///
/// Column names are the provider's own (`open`, `adjclose`, ...); mapping them
/// to the canonical schema is the normalizer's job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawPayload {
    /// Provider symbol the payload describes.
    pub symbol: String,
    /// IANA timezone of the trading session, if reported.
    pub timezone: Option<String>,
    /// Fixed UTC offset of the session, if reported instead of a zone name.
    pub utc_offset_seconds: Option<i32>,
    /// One entry per row.
    pub timestamps: Vec<RawTimestamp>,
    /// Row values keyed by provider column name; `None` marks a missing value.
    pub columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl RawPayload {
    /// Empty payload for `symbol`.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Set the reported session timezone.
    #[must_use]
    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = Some(tz.into());
        self
    }

    /// Set a fixed session offset.
    #[must_use]
    pub const fn with_utc_offset(mut self, seconds: i32) -> Self {
        self.utc_offset_seconds = Some(seconds);
        self
    }

    /// Set the row timestamps.
    #[must_use]
    pub fn with_timestamps(mut self, ts: Vec<RawTimestamp>) -> Self {
        self.timestamps = ts;
        self
    }

    /// Add or replace a column.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.columns.insert(name.into(), values);
        self
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// True when the provider returned no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// One provider request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    /// Caller-facing symbol.
    pub symbol: String,
    /// Asset class, which drives ticker formatting.
    pub asset_class: AssetClass,
    /// Provider-native timeframe to fetch.
    pub timeframe: Timeframe,
    /// Window to fetch.
    pub period: Period,
}

impl FetchRequest {
    /// Build a request.
    pub fn new(
        symbol: impl Into<String>,
        asset_class: AssetClass,
        timeframe: Timeframe,
        period: Period,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            asset_class,
            timeframe,
            period,
        }
    }

    /// Key identifying this request in errors.
    #[must_use]
    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(self.symbol.clone(), self.timeframe, self.period)
    }

    /// Reject requests that can never succeed.
    ///
    /// # Errors
    /// Returns `InvalidRequest` for an empty symbol.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.symbol.trim().is_empty() {
            return Err(FetchError::invalid(self.key(), "symbol must not be empty"));
        }
        Ok(())
    }
}
