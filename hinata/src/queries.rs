use hinata_core::{AssetClass, Period, SymbolCatalog, Timeframe};
use hinata_types::HinataError;

use crate::{Hinata, SeriesRequest};

impl Hinata {
    /// Close of the newest one-minute bar of the current session.
    ///
    /// `None` when the provider has no bars for today.
    ///
    /// # Errors
    /// Propagates every [`history`](Self::history) error.
    pub async fn latest_price(
        &self,
        symbol: &str,
        asset_class: AssetClass,
    ) -> Result<Option<f64>, HinataError> {
        let req = SeriesRequest::new(symbol, asset_class, Timeframe::M1, Period::D1);
        Ok(self.history(&req).await?.series.latest_close())
    }

    /// Whether the provider has recent daily data for `symbol`.
    ///
    /// An unknown symbol is `Ok(false)`, not an error.
    ///
    /// # Errors
    /// Anything other than `NotFound` from [`history`](Self::history).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "hinata::validate_symbol", skip(self), err)
    )]
    pub async fn validate_symbol(
        &self,
        symbol: &str,
        asset_class: AssetClass,
    ) -> Result<bool, HinataError> {
        let req = SeriesRequest::new(symbol, asset_class, Timeframe::D1, Period::D5);
        match self.history(&req).await {
            Ok(report) => Ok(!report.series.is_empty()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Configured symbols per asset class.
    #[must_use]
    pub const fn supported_symbols(&self) -> &SymbolCatalog {
        &self.cfg.catalog
    }

    /// The asset class `symbol` is listed under in the catalog.
    #[must_use]
    pub fn asset_class_of(&self, symbol: &str) -> Option<AssetClass> {
        self.cfg.catalog.class_of(symbol)
    }

    /// Every timeframe a chart can request, finest first.
    ///
    /// Use [`Timeframe::description`] for picker labels.
    #[must_use]
    pub const fn supported_timeframes(&self) -> &'static [Timeframe] {
        &Timeframe::ALL
    }

    /// Periods that make a useful chart at `timeframe`.
    #[must_use]
    pub const fn recommended_periods(&self, timeframe: Timeframe) -> &'static [Period] {
        Period::recommended_for(timeframe)
    }
}
