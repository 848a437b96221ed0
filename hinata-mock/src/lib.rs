//! hinata-mock
//!
//! Fetchers with deterministic data for tests and examples.
//!
//! [`MockFetcher`] serves the synthetic fixtures in [`fixtures`] and reacts to
//! a few magic symbols:
//!
//! | symbol        | behavior                                             |
//! |---------------|------------------------------------------------------|
//! | `FAIL`        | permanent `Rejected` error                           |
//! | `FLAKY`       | `RateLimited` for the first N calls, then data       |
//! | `HANG`        | never completes                                      |
//! | `EMPTY`       | valid, empty payload                                 |
//! | anything else | `NotFound` unless it is a fixture                    |
//!
//! [`DynamicMockFetcher`] defers to a controller so tests can script exact
//! payloads and failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hinata_core::{
    AssetClass, FetchCause, FetchError, FetchRequest, Fetcher, RawPayload, Timeframe,
};
use tokio::sync::Mutex;

mod dynamic;
pub mod fixtures;

pub use dynamic::{DynamicMockController, DynamicMockFetcher, MockBehavior};

/// Timeframes the mock serves natively. Coarser ones are left to resampling.
pub const SUPPORTED_TIMEFRAMES: &[Timeframe] = &[
    Timeframe::M1,
    Timeframe::M5,
    Timeframe::M15,
    Timeframe::M30,
    Timeframe::H1,
    Timeframe::D1,
];

const DEFAULT_FLAKY_FAILURES: usize = 2;

pub(crate) fn check_request(req: &FetchRequest) -> Result<(), FetchError> {
    req.validate()?;
    if SUPPORTED_TIMEFRAMES.contains(&req.timeframe) {
        Ok(())
    } else {
        Err(FetchError::invalid(
            req.key(),
            format!("timeframe {} is not served natively", req.timeframe),
        ))
    }
}

/// Fixture-backed fetcher that counts its calls.
pub struct MockFetcher {
    calls: AtomicUsize,
    per_symbol: Mutex<HashMap<String, usize>>,
    flaky_failures: usize,
    flaky_seen: AtomicUsize,
    latency: Option<Duration>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    /// Mock with no latency and two `FLAKY` failures.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            per_symbol: Mutex::new(HashMap::new()),
            flaky_failures: DEFAULT_FLAKY_FAILURES,
            flaky_seen: AtomicUsize::new(0),
            latency: None,
        }
    }

    /// Number of transient failures `FLAKY` produces before succeeding.
    #[must_use]
    pub const fn with_flaky_failures(mut self, n: usize) -> Self {
        self.flaky_failures = n;
        self
    }

    /// Sleep this long (Tokio time) before answering.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Total `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `fetch` calls for one symbol.
    pub async fn calls_for(&self, symbol: &str) -> usize {
        self.per_symbol.lock().await.get(symbol).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &'static str {
        "hinata-mock"
    }

    fn supported_timeframes(&self, _asset_class: AssetClass) -> &'static [Timeframe] {
        SUPPORTED_TIMEFRAMES
    }

    async fn fetch(&self, req: &FetchRequest) -> Result<RawPayload, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .per_symbol
            .lock()
            .await
            .entry(req.symbol.clone())
            .or_default() += 1;
        check_request(req)?;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match req.symbol.as_str() {
            "FAIL" => Err(FetchError::new(
                req.key(),
                FetchCause::Rejected("forced failure".into()),
            )),
            "HANG" => std::future::pending().await,
            "EMPTY" => Ok(RawPayload::new(req.symbol.clone()).with_timezone("America/New_York")),
            "FLAKY" if self.flaky_seen.fetch_add(1, Ordering::SeqCst) < self.flaky_failures => {
                Err(FetchError::new(req.key(), FetchCause::RateLimited))
            }
            symbol => fixtures::by_symbol(symbol)
                .map(|inst| fixtures::generate(inst, symbol, req.timeframe, req.period))
                .ok_or_else(|| FetchError::not_found(req.key())),
        }
    }
}
