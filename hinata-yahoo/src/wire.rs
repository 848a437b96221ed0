//! Serde model of the `v8/finance/chart` response.
//!
//! Only the fields the fetcher reads are modeled; everything else is ignored.

use serde::{Deserialize, Serialize};

/// Top-level chart response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartResponse {
    /// The `chart` envelope.
    pub chart: ChartEnvelope,
}

/// `chart` object: either results or an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartEnvelope {
    /// One entry per requested symbol; `null` on error.
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    /// Set when Yahoo refused the request.
    #[serde(default)]
    pub error: Option<ChartApiError>,
}

/// Error object Yahoo embeds in the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartApiError {
    /// Short code, e.g. `Not Found` or `Bad Request`.
    pub code: String,
    /// Human readable detail.
    #[serde(default)]
    pub description: Option<String>,
}

impl ChartApiError {
    /// Yahoo's way of saying the symbol is unknown or delisted.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
    }

    /// Description if present, else the code.
    #[must_use]
    pub fn message(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.code)
    }
}

/// One series in `chart.result`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    /// Exchange metadata.
    #[serde(default)]
    pub meta: ChartMeta,
    /// Bar open times in epoch seconds. Absent when the range holds no bars.
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    /// Value arrays parallel to `timestamp`.
    #[serde(default)]
    pub indicators: Indicators,
}

/// Subset of `chart.result[].meta`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    /// Ticker as Yahoo knows it.
    #[serde(default)]
    pub symbol: Option<String>,
    /// IANA zone of the exchange, e.g. `America/New_York`.
    #[serde(default)]
    pub exchange_timezone_name: Option<String>,
    /// Current UTC offset of the exchange in seconds.
    #[serde(default)]
    pub gmtoffset: Option<i32>,
}

/// `chart.result[].indicators`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    /// OHLCV block; Yahoo sends exactly one.
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
    /// Dividend/split adjusted closes, daily-or-coarser intervals only.
    #[serde(default)]
    pub adjclose: Option<Vec<AdjCloseBlock>>,
}

/// Parallel OHLCV arrays; `null` entries mark missing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct QuoteBlock {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

/// `indicators.adjclose[]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjCloseBlock {
    /// Adjusted close per bar.
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}
