use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Bucket width of a candle.
///
/// Variants are declared from finest to coarsest, so the derived `Ord` is the
/// granularity order (`1m < 5m < ... < 1mo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    /// One minute.
    #[serde(rename = "1m")]
    M1,
    /// Five minutes.
    #[serde(rename = "5m")]
    M5,
    /// Fifteen minutes.
    #[serde(rename = "15m")]
    M15,
    /// Thirty minutes.
    #[serde(rename = "30m")]
    M30,
    /// One hour.
    #[serde(rename = "1h", alias = "60m")]
    H1,
    /// Four hours. Usually synthesized from hourly bars.
    #[serde(rename = "4h")]
    H4,
    /// One trading day.
    #[serde(rename = "1d")]
    D1,
    /// One week, Monday start.
    #[serde(rename = "1wk")]
    W1,
    /// One calendar month.
    #[serde(rename = "1mo")]
    Mo1,
}

impl Timeframe {
    /// Every timeframe, finest first.
    pub const ALL: [Self; 9] = [
        Self::M1,
        Self::M5,
        Self::M15,
        Self::M30,
        Self::H1,
        Self::H4,
        Self::D1,
        Self::W1,
        Self::Mo1,
    ];

    /// Canonical code (`"1m"`, `"1h"`, `"1wk"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "1h",
            Self::H4 => "4h",
            Self::D1 => "1d",
            Self::W1 => "1wk",
            Self::Mo1 => "1mo",
        }
    }

    /// Human readable label used by timeframe pickers.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::M1 => "1 Minute (intraday)",
            Self::M5 => "5 Minutes (intraday)",
            Self::M15 => "15 Minutes (intraday)",
            Self::M30 => "30 Minutes (intraday)",
            Self::H1 => "1 Hour (intraday)",
            Self::H4 => "4 Hours (resampled)",
            Self::D1 => "1 Day (daily)",
            Self::W1 => "1 Week (weekly)",
            Self::Mo1 => "1 Month (monthly)",
        }
    }

    /// Fixed bucket length in minutes for intraday timeframes.
    ///
    /// Calendar-based timeframes (daily and coarser) return `None`.
    #[must_use]
    pub const fn minutes(self) -> Option<i64> {
        match self {
            Self::M1 => Some(1),
            Self::M5 => Some(5),
            Self::M15 => Some(15),
            Self::M30 => Some(30),
            Self::H1 => Some(60),
            Self::H4 => Some(240),
            Self::D1 | Self::W1 | Self::Mo1 => None,
        }
    }

    /// True for sub-daily timeframes.
    #[must_use]
    pub const fn is_intraday(self) -> bool {
        self.minutes().is_some()
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code == "60m" {
            return Ok(Self::H1);
        }
        Self::ALL
            .into_iter()
            .find(|tf| tf.as_str() == code)
            .ok_or_else(|| ParseError::Timeframe(s.to_string()))
    }
}
