use std::sync::Arc;

use hinata_core::{Fetcher, RetryConfig};
use hinata_middleware::{FetcherBuilder, RetryMiddleware};
use hinata_mock::MockFetcher;

#[test]
fn retry_layer_is_replaced_not_stacked() {
    let raw: Arc<dyn Fetcher> = Arc::new(MockFetcher::new());
    let first = RetryConfig {
        max_attempts: 2,
        ..RetryConfig::default()
    };
    let b = FetcherBuilder::new(raw)
        .with_retry(first)
        .with_retry(RetryConfig::default());
    assert_eq!(b.layers(), vec!["RetryMiddleware"]);
    assert!(b.without_retry().layers().is_empty());
}

#[test]
fn built_stack_reports_the_raw_fetcher_name() {
    let raw: Arc<dyn Fetcher> = Arc::new(MockFetcher::new());
    let built = FetcherBuilder::new(raw).with_retry(RetryConfig::default()).build();
    assert_eq!(built.name(), "hinata-mock");
}

#[test]
fn custom_layers_go_outermost() {
    let raw: Arc<dyn Fetcher> = Arc::new(MockFetcher::new());
    let b = FetcherBuilder::new(raw)
        .layer(Box::new(RetryMiddleware::new(RetryConfig::default())))
        .with_retry(RetryConfig::default());
    // `with_retry` replaces every layer named RetryMiddleware.
    assert_eq!(b.layers().len(), 1);

    let built = b.build();
    assert_eq!(built.name(), "hinata-mock");
}
