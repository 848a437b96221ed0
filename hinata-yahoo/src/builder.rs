use std::sync::Arc;

use hinata_core::Fetcher;
use hinata_middleware::FetcherBuilder;
use hinata_types::RetryConfig;

use crate::{AdapterBuildError, ChartApi, YahooFetcher};

/// Builder type alias specialized for the Yahoo fetcher.
pub type YahooFetcherBuilder = FetcherBuilder;

impl YahooFetcher {
    /// Builder for the public endpoint, with the default retry policy.
    ///
    /// Customize with the builder methods before calling `.build()`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn builder() -> Result<YahooFetcherBuilder, AdapterBuildError> {
        let raw: Arc<dyn Fetcher> = Arc::new(Self::new_default()?);
        Ok(FetcherBuilder::new(raw).with_retry(RetryConfig::default()))
    }

    /// Builder over an explicit adapter, with the default retry policy.
    #[must_use]
    pub fn builder_with_api(api: Arc<dyn ChartApi>) -> YahooFetcherBuilder {
        let raw: Arc<dyn Fetcher> = Arc::new(Self::from_api(api));
        FetcherBuilder::new(raw).with_retry(RetryConfig::default())
    }
}
