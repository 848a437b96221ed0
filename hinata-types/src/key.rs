use core::fmt;

use serde::{Deserialize, Serialize};

use crate::period::Period;
use crate::timeframe::Timeframe;

/// Identity of one cached series and of a failed request.
///
/// Symbols are stored as given by the caller; the provider ticker format is
/// derived from them later and never leaks into keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    /// Caller-facing symbol (e.g. `AAPL`, `BTC-USD`).
    pub symbol: String,
    /// Requested candle width.
    pub timeframe: Timeframe,
    /// Requested window after provider adjustment.
    pub period: Period,
}

impl SeriesKey {
    /// Build a key.
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, period: Period) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            period,
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.symbol, self.timeframe, self.period)
    }
}
