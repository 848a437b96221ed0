use hinata_core::Fetcher;
use std::sync::Arc;

/// Return a fetcher for the demos.
///
/// Set `HINATA_EXAMPLES_USE_MOCK` to run against deterministic fixtures
/// instead of the live chart API.
///
/// # Panics
/// Panics if the HTTP client for the Yahoo fetcher cannot be built.
#[must_use]
pub fn get_fetcher() -> Arc<dyn Fetcher> {
    if std::env::var("HINATA_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using Mock Fetcher) ---");
        Arc::new(hinata_mock::MockFetcher::new())
    } else {
        hinata_yahoo::YahooFetcher::builder()
            .expect("http client")
            .build()
    }
}

/// Install a human-friendly subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(true)
        .try_init();
}
