//! hinata-yahoo
//!
//! [`Fetcher`] implementation on top of Yahoo Finance's public
//! `v8/finance/chart` endpoint. Formats caller symbols into Yahoo tickers per
//! asset class, calls the endpoint through an injectable [`ChartApi`] and
//! hands back the provider-native columns as a [`RawPayload`].
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod builder;
mod decode;
/// Serde model of the chart response.
pub mod wire;

use std::sync::Arc;

use async_trait::async_trait;
use hinata_core::{AssetClass, FetchError, FetchRequest, Fetcher, RawPayload, Timeframe};

pub use adapter::{AdapterBuildError, ChartApi, ChartQuery, RealChartApi};

/// Intervals the chart endpoint serves. `4h` is synthesized downstream.
pub const NATIVE_TIMEFRAMES: &[Timeframe] = &[
    Timeframe::M1,
    Timeframe::M5,
    Timeframe::M15,
    Timeframe::M30,
    Timeframe::H1,
    Timeframe::D1,
    Timeframe::W1,
    Timeframe::Mo1,
];

/// Yahoo ticker for a caller-facing symbol.
///
/// - equity: upper-cased as-is (`aapl` → `AAPL`)
/// - crypto: `-USD` appended when no quote currency is given (`BTC` → `BTC-USD`,
///   `ETH/EUR` → `ETH-EUR`)
/// - forex: separators dropped and `=X` appended (`EUR/USD` → `EURUSD=X`)
#[must_use]
pub fn provider_ticker(symbol: &str, asset_class: AssetClass) -> String {
    let s = symbol.trim().to_ascii_uppercase();
    match asset_class {
        AssetClass::Equity => s,
        AssetClass::Crypto => {
            let s = s.replace('/', "-");
            if s.contains('-') { s } else { format!("{s}-USD") }
        }
        AssetClass::Forex => {
            let s: String = s.chars().filter(|c| !matches!(c, '/' | '-' | ' ')).collect();
            if s.ends_with("=X") { s } else { format!("{s}=X") }
        }
    }
}

/// Chart query for a fetch request.
#[must_use]
pub fn chart_query(req: &FetchRequest) -> ChartQuery {
    ChartQuery {
        ticker: provider_ticker(&req.symbol, req.asset_class),
        range: req.period.as_str().to_string(),
        interval: req.timeframe.as_str().to_string(),
    }
}

/// Fetcher backed by the Yahoo chart endpoint.
pub struct YahooFetcher {
    api: Arc<dyn ChartApi>,
}

impl YahooFetcher {
    /// Fetcher talking to the public endpoint.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new_default() -> Result<Self, AdapterBuildError> {
        Ok(Self::from_api(Arc::new(RealChartApi::new_default()?)))
    }

    /// Fetcher over any chart adapter, e.g. a [`RealChartApi`] pointed at a
    /// proxy, or a closure-backed stub.
    #[must_use]
    pub fn from_api(api: Arc<dyn ChartApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Fetcher for YahooFetcher {
    fn name(&self) -> &'static str {
        "hinata-yahoo"
    }

    fn supported_timeframes(&self, _asset_class: AssetClass) -> &'static [Timeframe] {
        NATIVE_TIMEFRAMES
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "hinata_yahoo::fetch",
            skip(self, req),
            fields(symbol = %req.symbol, timeframe = %req.timeframe, period = %req.period),
            err
        )
    )]
    async fn fetch(&self, req: &FetchRequest) -> Result<RawPayload, FetchError> {
        req.validate()?;
        if !NATIVE_TIMEFRAMES.contains(&req.timeframe) {
            return Err(FetchError::invalid(
                req.key(),
                format!("interval {} is not served by the chart endpoint", req.timeframe),
            ));
        }
        let query = chart_query(req);
        let resp = self
            .api
            .chart(&query)
            .await
            .map_err(|cause| FetchError::new(req.key(), cause))?;
        let payload = decode::into_payload(resp, &req.symbol)
            .map_err(|cause| FetchError::new(req.key(), cause))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(ticker = %query.ticker, rows = payload.len(), "chart decoded");
        Ok(payload)
    }
}
