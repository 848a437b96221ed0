use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::SeriesKey;
use crate::timeframe::Timeframe;

/// Failure to parse one of the enumerated codes.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown asset class label.
    #[error("unknown asset class: {0}")]
    AssetClass(String),
    /// Unknown timeframe code.
    #[error("unknown timeframe: {0}")]
    Timeframe(String),
    /// Unknown period code.
    #[error("unknown period: {0}")]
    Period(String),
}

/// Why a provider request failed.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchCause {
    /// The provider does not know the symbol or has no data for it.
    #[error("symbol not found")]
    NotFound,
    /// The provider throttled the request.
    #[error("rate limited")]
    RateLimited,
    /// The request did not complete in time.
    #[error("timed out")]
    Timeout,
    /// The provider answered with a server-side error status.
    #[error("server error {0}")]
    Server(u16),
    /// The provider refused the symbol/timeframe/period combination.
    #[error("rejected: {0}")]
    Rejected(String),
    /// The provider could not be reached.
    #[error("unreachable: {0}")]
    Unreachable(String),
    /// The response body could not be decoded.
    #[error("undecodable response: {0}")]
    Decode(String),
    /// The request was invalid before it was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchCause {
    /// Whether another attempt may succeed without changing the request.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Timeout | Self::Server(_) | Self::Unreachable(_)
        )
    }
}

/// A provider request failed; carries the attempted key.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[error("fetch {key} failed: {cause}")]
pub struct FetchError {
    /// The series that was requested.
    pub key: SeriesKey,
    /// What went wrong.
    pub cause: FetchCause,
}

impl FetchError {
    /// Build a fetch error for `key`.
    #[must_use]
    pub const fn new(key: SeriesKey, cause: FetchCause) -> Self {
        Self { key, cause }
    }

    /// Helper: `NotFound` for `key`.
    #[must_use]
    pub const fn not_found(key: SeriesKey) -> Self {
        Self::new(key, FetchCause::NotFound)
    }

    /// Helper: `InvalidRequest` for `key`.
    pub fn invalid(key: SeriesKey, msg: impl Into<String>) -> Self {
        Self::new(key, FetchCause::InvalidRequest(msg.into()))
    }

    /// Whether a retry may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.cause.is_transient()
    }
}

/// A raw payload or candle list is structurally unusable.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// A column required by the field map is absent while rows exist.
    #[error("payload for {symbol} is missing required column `{column}`")]
    MissingColumn {
        /// Symbol of the payload.
        symbol: String,
        /// Provider column name.
        column: String,
    },
    /// A column does not line up with the timestamp vector.
    #[error("column `{column}` has {actual} values but {expected} timestamps")]
    LengthMismatch {
        /// Provider column name.
        column: String,
        /// Number of timestamps.
        expected: usize,
        /// Number of values in the column.
        actual: usize,
    },
    /// The payload names a timezone that does not exist.
    #[error("unknown timezone `{0}`")]
    UnknownTimezone(String),
    /// A candle list breaks the series invariants.
    #[error("series invariant violated at index {index}: {reason}")]
    InvariantViolation {
        /// Offending candle position.
        index: usize,
        /// Which rule was broken.
        reason: String,
    },
}

/// Resampling was asked for something that cannot be aggregated.
#[derive(Debug, Error, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ResampleError {
    /// Target is finer than or equal to the source.
    #[error("cannot resample {from} into {to}: target is not coarser")]
    NotCoarser {
        /// Source timeframe.
        from: Timeframe,
        /// Requested timeframe.
        to: Timeframe,
    },
    /// Target buckets do not align with source buckets.
    #[error("cannot resample {from} into {to}: buckets do not align")]
    Misaligned {
        /// Source timeframe.
        from: Timeframe,
        /// Requested timeframe.
        to: Timeframe,
    },
}

/// Unified error type for the HINATA workspace.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HinataError {
    /// Provider request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Raw payload for `key` unusable.
    #[error("{key}: {source}")]
    Validation {
        /// Key whose payload failed to normalize.
        key: SeriesKey,
        /// What was wrong with it.
        #[source]
        source: ValidationError,
    },
    /// Resampling the series for `key` violated the aggregation contract.
    #[error("{key}: {source}")]
    Resample {
        /// Key being served.
        key: SeriesKey,
        /// Why the aggregation was refused.
        #[source]
        source: ResampleError,
    },
    /// Invalid builder or configuration input.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HinataError {
    /// The attempted key, when the error carries one.
    #[must_use]
    pub const fn key(&self) -> Option<&SeriesKey> {
        match self {
            Self::Fetch(e) => Some(&e.key),
            Self::Validation { key, .. } | Self::Resample { key, .. } => Some(key),
            Self::Config(_) => None,
        }
    }

    /// Attach `key` to a normalization failure.
    #[must_use]
    pub const fn validation(key: SeriesKey, source: ValidationError) -> Self {
        Self::Validation { key, source }
    }

    /// Attach `key` to a resampling failure.
    #[must_use]
    pub const fn resample(key: SeriesKey, source: ResampleError) -> Self {
        Self::Resample { key, source }
    }

    /// Returns true if this error should be surfaced to users as actionable.
    ///
    /// An unknown symbol is the user's input problem, not a system failure.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(
            self,
            Self::Fetch(FetchError {
                cause: FetchCause::NotFound,
                ..
            })
        )
    }

    /// Whether this is a provider `NotFound`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        !self.is_actionable()
    }
}
