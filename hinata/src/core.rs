use std::sync::Arc;

use hinata_core::{Fetcher, SeriesKey};
use hinata_middleware::{FetcherBuilder, SeriesCache};
use hinata_types::{HinataConfig, HinataError};

/// Orchestrator that serves chart series from a cache in front of one provider.
pub struct Hinata {
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) cache: Arc<SeriesCache>,
    pub(crate) cfg: HinataConfig,
}

impl std::fmt::Debug for Hinata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hinata")
            .field("fetcher", &self.fetcher.name())
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

enum FetcherSlot {
    /// Used as given; the caller composed its own middleware.
    Composed(Arc<dyn Fetcher>),
    /// Wrapped with the configured retry policy at build time.
    Raw(Arc<dyn Fetcher>),
}

/// Builder for constructing a `Hinata` orchestrator with custom configuration.
#[derive(Default)]
pub struct HinataBuilder {
    fetcher: Option<FetcherSlot>,
    cache: Option<Arc<SeriesCache>>,
    cfg: HinataConfig,
}

impl HinataBuilder {
    /// Create a new builder with default configuration and no fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `fetcher` as is.
    ///
    /// Pass a stack built with [`FetcherBuilder`] (or a connector's own
    /// builder) when retries are wanted.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(FetcherSlot::Composed(fetcher));
        self
    }

    /// Use `fetcher` wrapped in a retry layer configured from
    /// [`HinataConfig::retry`].
    #[must_use]
    pub fn with_raw_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(FetcherSlot::Raw(fetcher));
        self
    }

    /// Share an existing cache. Without one, `build` creates a private cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<SeriesCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: HinataConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Toggle use of the provider's adjusted close.
    #[must_use]
    pub const fn prefer_adjusted_close(mut self, yes: bool) -> Self {
        self.cfg.prefer_adjusted_close = yes;
        self
    }

    /// Toggle collapsing of concurrent requests for the same key.
    #[must_use]
    pub const fn coalesce_in_flight(mut self, yes: bool) -> Self {
        self.cfg.coalesce_in_flight = yes;
        self
    }

    /// Build the `Hinata` orchestrator.
    ///
    /// # Errors
    /// Returns `Config` if no fetcher has been set.
    pub fn build(self) -> Result<Hinata, HinataError> {
        let fetcher = match self.fetcher {
            Some(FetcherSlot::Composed(f)) => f,
            Some(FetcherSlot::Raw(f)) => FetcherBuilder::new(f).with_retry(self.cfg.retry).build(),
            None => {
                return Err(HinataError::Config(
                    "no fetcher set; add one via with_fetcher(...)".to_string(),
                ));
            }
        };
        Ok(Hinata {
            fetcher,
            cache: self.cache.unwrap_or_default(),
            cfg: self.cfg,
        })
    }
}

impl Hinata {
    /// Start building a new `Hinata` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use hinata::{Hinata, SeriesCache};
    ///
    /// let cache = Arc::new(SeriesCache::new());
    /// let hinata = Hinata::builder()
    ///     .with_fetcher(yahoo)
    ///     .with_cache(cache)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> HinataBuilder {
        HinataBuilder::new()
    }

    /// The series cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<SeriesCache> {
        &self.cache
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &HinataConfig {
        &self.cfg
    }

    /// Name of the outermost fetcher layer.
    #[must_use]
    pub fn fetcher_name(&self) -> &'static str {
        self.fetcher.name()
    }

    /// Drop the cached series for `key`. Returns whether one was cached.
    pub async fn invalidate(&self, key: &SeriesKey) -> bool {
        let removed = self.cache.invalidate(key).await;
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "hinata::cache", %key, removed, "invalidated");
        removed
    }
}
