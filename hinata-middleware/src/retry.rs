use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hinata_core::{
    AssetClass, BackoffConfig, FetchCause, FetchError, FetchRequest, Fetcher, RawPayload,
    RetryConfig, Timeframe,
};
use rand::Rng;

/// Add up to `jitter_percent` of `base_ms` at random.
pub fn jitter_wait(base_ms: u64, jitter_percent: u8) -> u64 {
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, base_ms.saturating_mul(u64::from(jitter_percent)) / 100)
    };
    let mut rng = rand::rng();
    base_ms + rng.random_range(0..jitter_range)
}

fn backoff_delay(cfg: &BackoffConfig, attempt: u32) -> Duration {
    Duration::from_millis(jitter_wait(cfg.base_delay_ms(attempt), cfg.jitter_percent))
}

/// Fetcher wrapper that retries transient failures with jittered exponential
/// backoff and bounds each attempt with a timeout.
///
/// Permanent failures (unknown symbol, rejected request, decode errors) are
/// returned on the first occurrence.
pub struct RetryingFetcher {
    inner: Arc<dyn Fetcher>,
    cfg: RetryConfig,
}

impl RetryingFetcher {
    /// Wrap `inner`.
    #[must_use]
    pub const fn new(inner: Arc<dyn Fetcher>, cfg: RetryConfig) -> Self {
        Self { inner, cfg }
    }

    async fn attempt(&self, req: &FetchRequest) -> Result<RawPayload, FetchError> {
        if self.cfg.attempt_timeout.is_zero() {
            return self.inner.fetch(req).await;
        }
        tokio::time::timeout(self.cfg.attempt_timeout, self.inner.fetch(req))
            .await
            .unwrap_or_else(|_| Err(FetchError::new(req.key(), FetchCause::Timeout)))
    }
}

#[async_trait]
impl Fetcher for RetryingFetcher {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn supported_timeframes(&self, asset_class: AssetClass) -> &'static [Timeframe] {
        self.inner.supported_timeframes(asset_class)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "hinata::retry::fetch",
            skip(self, req),
            fields(symbol = %req.symbol, timeframe = %req.timeframe, period = %req.period),
        )
    )]
    async fn fetch(&self, req: &FetchRequest) -> Result<RawPayload, FetchError> {
        let max_attempts = self.cfg.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.attempt(req).await {
                Ok(payload) => return Ok(payload),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = backoff_delay(&self.cfg.backoff, attempt);
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        target: "hinata::retry",
                        attempt,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient fetch failure; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Declarative wrapper that applies [`RetryingFetcher`] when building a stack.
pub struct RetryMiddleware {
    cfg: RetryConfig,
}

impl RetryMiddleware {
    /// Middleware with the given policy.
    #[must_use]
    pub const fn new(cfg: RetryConfig) -> Self {
        Self { cfg }
    }
}

impl hinata_core::Middleware for RetryMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn Fetcher>) -> Arc<dyn Fetcher> {
        Arc::new(RetryingFetcher::new(inner, self.cfg))
    }

    fn name(&self) -> &'static str {
        "RetryMiddleware"
    }
}
