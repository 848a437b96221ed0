use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hinata_core::{
    AssetClass, BackoffConfig, FetchCause, FetchError, FetchRequest, Fetcher, Period, RawPayload,
    RetryConfig, Timeframe,
};
use hinata_middleware::FetcherBuilder;
use hinata_mock::MockFetcher;

struct CountingFetcher {
    inner: Arc<dyn Fetcher>,
    count: Arc<AtomicUsize>,
}

#[async_trait]
impl Fetcher for CountingFetcher {
    fn name(&self) -> &'static str {
        "counting"
    }
    fn supported_timeframes(&self, asset_class: AssetClass) -> &'static [Timeframe] {
        self.inner.supported_timeframes(asset_class)
    }
    async fn fetch(&self, req: &FetchRequest) -> Result<RawPayload, FetchError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(req).await
    }
}

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        attempt_timeout: Duration::from_millis(200),
        backoff: BackoffConfig {
            min_backoff_ms: 1,
            max_backoff_ms: 5,
            factor: 2,
            jitter_percent: 0,
        },
    }
}

fn counted(mock: MockFetcher) -> (Arc<dyn Fetcher>, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let raw: Arc<dyn Fetcher> = Arc::new(CountingFetcher {
        inner: Arc::new(mock),
        count: Arc::clone(&count),
    });
    (raw, count)
}

fn req(symbol: &str) -> FetchRequest {
    FetchRequest::new(symbol, AssetClass::Equity, Timeframe::D1, Period::Mo1)
}

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
    let (raw, count) = counted(MockFetcher::new().with_flaky_failures(2));
    let f = FetcherBuilder::new(raw).with_retry(fast_retry(3)).build();

    let payload = f.fetch(&req("FLAKY")).await.expect("third attempt succeeds");
    assert!(!payload.is_empty());
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_budget_is_bounded() {
    let (raw, count) = counted(MockFetcher::new().with_flaky_failures(10));
    let f = FetcherBuilder::new(raw).with_retry(fast_retry(3)).build();

    let err = f.fetch(&req("FLAKY")).await.unwrap_err();
    assert_eq!(err.cause, FetchCause::RateLimited);
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn permanent_failures_are_not_retried() {
    let (raw, count) = counted(MockFetcher::new());
    let f = FetcherBuilder::new(raw).with_retry(fast_retry(5)).build();

    let err = f.fetch(&req("ZZZZINVALID")).await.unwrap_err();
    assert_eq!(err.cause, FetchCause::NotFound);
    assert_eq!(err.key.symbol, "ZZZZINVALID");
    let err = f.fetch(&req("FAIL")).await.unwrap_err();
    assert!(matches!(err.cause, FetchCause::Rejected(_)));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn hung_attempts_time_out_and_count_as_transient() {
    let (raw, count) = counted(MockFetcher::new());
    let f = FetcherBuilder::new(raw).with_retry(fast_retry(2)).build();

    let err = f.fetch(&req("HANG")).await.unwrap_err();
    assert_eq!(err.cause, FetchCause::Timeout);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn without_retry_is_a_single_call() {
    let (raw, count) = counted(MockFetcher::new().with_flaky_failures(1));
    let f = FetcherBuilder::new(raw)
        .with_retry(fast_retry(3))
        .without_retry()
        .build();

    assert!(f.fetch(&req("FLAKY")).await.is_err());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
