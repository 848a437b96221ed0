#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hinata::{
    AssetClass, BackoffConfig, FetchError, FetchRequest, Fetcher, Hinata, HinataConfig,
    RawPayload, RetryConfig, Series, Timeframe,
};
use hinata_mock::MockFetcher;

/// Orchestrator over a fixture mock, returning the mock for call counting.
pub fn with_mock(mock: MockFetcher, cfg: HinataConfig) -> (Hinata, Arc<MockFetcher>) {
    let mock = Arc::new(mock);
    let hinata = Hinata::builder()
        .with_fetcher(Arc::clone(&mock) as Arc<dyn Fetcher>)
        .config(cfg)
        .build()
        .expect("fetcher is set");
    (hinata, mock)
}

pub fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        attempt_timeout: Duration::from_millis(500),
        backoff: BackoffConfig {
            min_backoff_ms: 1,
            max_backoff_ms: 5,
            factor: 2,
            jitter_percent: 0,
        },
    }
}

/// Ascending, unique timestamps and valid candles.
pub fn assert_canonical(series: &Series) {
    for w in series.candles().windows(2) {
        assert!(w[0].ts < w[1].ts, "timestamps must strictly increase");
    }
    for c in series.candles() {
        assert!(c.is_valid(), "invalid candle {c:?}");
    }
}

/// Fetcher with a fixed timeframe list that counts calls and never succeeds.
pub struct NarrowFetcher {
    pub supported: &'static [Timeframe],
    pub calls: AtomicUsize,
}

impl NarrowFetcher {
    pub const fn new(supported: &'static [Timeframe]) -> Self {
        Self {
            supported,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for NarrowFetcher {
    fn name(&self) -> &'static str {
        "narrow"
    }
    fn supported_timeframes(&self, _asset_class: AssetClass) -> &'static [Timeframe] {
        self.supported
    }
    async fn fetch(&self, req: &FetchRequest) -> Result<RawPayload, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FetchError::not_found(req.key()))
    }
}
