use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::timeframe::Timeframe;

/// Historical window requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// One day.
    #[serde(rename = "1d")]
    D1,
    /// Five days.
    #[serde(rename = "5d")]
    D5,
    /// Seven days.
    #[serde(rename = "7d")]
    D7,
    /// Sixty days.
    #[serde(rename = "60d")]
    D60,
    /// One month.
    #[serde(rename = "1mo")]
    Mo1,
    /// Three months.
    #[serde(rename = "3mo")]
    Mo3,
    /// Six months.
    #[serde(rename = "6mo")]
    Mo6,
    /// One year.
    #[serde(rename = "1y")]
    Y1,
    /// Two years.
    #[serde(rename = "2y")]
    Y2,
    /// 730 days, the longest hourly window most providers accept.
    #[serde(rename = "730d")]
    D730,
    /// Five years.
    #[serde(rename = "5y")]
    Y5,
    /// Ten years.
    #[serde(rename = "10y")]
    Y10,
    /// Year to date.
    #[serde(rename = "ytd")]
    Ytd,
    /// Everything the provider has.
    #[serde(rename = "max")]
    Max,
}

impl Period {
    /// Every period, shortest first.
    pub const ALL: [Self; 14] = [
        Self::D1,
        Self::D5,
        Self::D7,
        Self::D60,
        Self::Mo1,
        Self::Mo3,
        Self::Mo6,
        Self::Y1,
        Self::Y2,
        Self::D730,
        Self::Y5,
        Self::Y10,
        Self::Ytd,
        Self::Max,
    ];

    /// Provider range code (`"5d"`, `"1y"`, `"max"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::D1 => "1d",
            Self::D5 => "5d",
            Self::D7 => "7d",
            Self::D60 => "60d",
            Self::Mo1 => "1mo",
            Self::Mo3 => "3mo",
            Self::Mo6 => "6mo",
            Self::Y1 => "1y",
            Self::Y2 => "2y",
            Self::D730 => "730d",
            Self::Y5 => "5y",
            Self::Y10 => "10y",
            Self::Ytd => "ytd",
            Self::Max => "max",
        }
    }

    /// Approximate window length in days. `ytd` counts as a year and `max` as ten.
    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::D1 => 1,
            Self::D5 => 5,
            Self::D7 => 7,
            Self::D60 => 60,
            Self::Mo1 => 30,
            Self::Mo3 => 90,
            Self::Mo6 => 180,
            Self::Y1 | Self::Ytd => 365,
            Self::Y2 | Self::D730 => 730,
            Self::Y5 => 1825,
            Self::Y10 | Self::Max => 3650,
        }
    }

    /// Clamp this window to what a provider accepts for `timeframe`.
    ///
    /// Returns the (possibly unchanged) period and whether it was adjusted.
    /// Minute bars are only served for short windows, and weekly/monthly bars
    /// over a single day would produce at most one candle.
    #[must_use]
    pub const fn adjust_for(self, timeframe: Timeframe) -> (Self, bool) {
        let days = self.days();
        match timeframe {
            Timeframe::M1 | Timeframe::M5 if days > 7 => (Self::D5, true),
            Timeframe::M15 | Timeframe::M30 if days > 60 => (Self::D60, true),
            Timeframe::H1 | Timeframe::H4 if days > 730 => (Self::D730, true),
            Timeframe::W1 if matches!(self, Self::D1) => (Self::Mo3, true),
            Timeframe::Mo1 if matches!(self, Self::D1) => (Self::Y2, true),
            _ => (self, false),
        }
    }

    /// Periods that produce a useful chart for `timeframe`.
    #[must_use]
    pub const fn recommended_for(timeframe: Timeframe) -> &'static [Self] {
        match timeframe {
            Timeframe::M1 | Timeframe::M5 => &[Self::D1, Self::D5],
            Timeframe::M15 | Timeframe::M30 => &[Self::D1, Self::D5, Self::Mo1],
            Timeframe::H1 | Timeframe::H4 => &[Self::D5, Self::Mo1, Self::Mo3, Self::Mo6],
            Timeframe::D1 => &[
                Self::Mo1,
                Self::Mo3,
                Self::Mo6,
                Self::Y1,
                Self::Y2,
                Self::Y5,
                Self::Y10,
                Self::Max,
            ],
            Timeframe::W1 => &[Self::Mo6, Self::Y1, Self::Y2, Self::Y5, Self::Y10, Self::Max],
            Timeframe::Mo1 => &[Self::Y1, Self::Y2, Self::Y5, Self::Y10, Self::Max],
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == code)
            .ok_or_else(|| ParseError::Period(s.to_string()))
    }
}
