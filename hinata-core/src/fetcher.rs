use async_trait::async_trait;

use crate::types::{AssetClass, FetchError, FetchRequest, RawPayload, Timeframe};

/// Source of raw time-series data for one instrument/timeframe/period.
///
/// Implementations issue one provider request per call and never touch the
/// cache. Asset-class specific request formatting (ticker suffixes and the
/// like) belongs inside the implementation.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Stable provider name for logs and errors.
    fn name(&self) -> &'static str;

    /// REQUIRED: exact timeframes this provider can natively serve.
    ///
    /// Coarser timeframes outside this list are synthesized by resampling.
    fn supported_timeframes(&self, asset_class: AssetClass) -> &'static [Timeframe];

    /// Fetch the provider-native payload for `req`.
    ///
    /// An instrument without data in the window yields an empty payload, not
    /// an error.
    async fn fetch(&self, req: &FetchRequest) -> Result<RawPayload, FetchError>;
}
