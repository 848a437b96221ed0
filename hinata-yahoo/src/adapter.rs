#[cfg(feature = "test-adapters")]
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hinata_core::FetchCause;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::wire::ChartResponse;

/// Public chart endpoint host.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Parameters of one chart call, already in Yahoo's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartQuery {
    /// Provider ticker, e.g. `BTC-USD` or `EURUSD=X`.
    pub ticker: String,
    /// Range code, e.g. `1y`.
    pub range: String,
    /// Interval code, e.g. `1h`.
    pub interval: String,
}

/// Chart endpoint abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait ChartApi: Send + Sync {
    /// Fetch and decode the chart document for `query`.
    async fn chart(&self, query: &ChartQuery) -> Result<ChartResponse, FetchCause>;
}

/// Failure to construct the production adapter.
#[derive(Debug, Error)]
pub enum AdapterBuildError {
    /// The base URL does not parse or cannot carry a path.
    #[error("invalid base url `{0}`")]
    BaseUrl(String),
    /// The HTTP client could not be built.
    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Production adapter backed by `reqwest`.
///
/// `reqwest::Client` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Clone, Debug)]
pub struct RealChartApi {
    http: reqwest::Client,
    base: Url,
}

impl RealChartApi {
    /// Adapter for the public endpoint with a 30 s request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new_default() -> Result<Self, AdapterBuildError> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Adapter for `base_url` (scheme and host, optionally a path prefix).
    ///
    /// # Errors
    /// Returns an error for an unusable base URL or if the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AdapterBuildError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing client.
    ///
    /// # Errors
    /// Returns an error for an unusable base URL.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, AdapterBuildError> {
        let base = Url::parse(base_url)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| AdapterBuildError::BaseUrl(base_url.to_string()))?;
        Ok(Self { http, base })
    }

    /// Full request URL for `query`.
    #[must_use]
    pub fn url_for(&self, query: &ChartQuery) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart", query.ticker.as_str()]);
        }
        url.query_pairs_mut()
            .append_pair("range", &query.range)
            .append_pair("interval", &query.interval)
            .append_pair("includePrePost", "false")
            .append_pair("events", "div,splits");
        url
    }
}

fn map_transport_err(e: &reqwest::Error) -> FetchCause {
    if e.is_timeout() {
        FetchCause::Timeout
    } else if e.is_decode() {
        FetchCause::Decode(e.to_string())
    } else {
        FetchCause::Unreachable(e.to_string())
    }
}

/// Map a non-success HTTP status, using Yahoo's error envelope when present.
fn map_status(status: StatusCode, body: &str) -> FetchCause {
    let envelope = serde_json::from_str::<ChartResponse>(body)
        .ok()
        .and_then(|r| r.chart.error);
    match status.as_u16() {
        404 => FetchCause::NotFound,
        429 => FetchCause::RateLimited,
        code @ 500..=599 => FetchCause::Server(code),
        code => match envelope {
            Some(err) if err.is_not_found() => FetchCause::NotFound,
            Some(err) => FetchCause::Rejected(format!("{code}: {}", err.message())),
            None => FetchCause::Rejected(format!("http status {code}")),
        },
    }
}

#[async_trait]
impl ChartApi for RealChartApi {
    async fn chart(&self, query: &ChartQuery) -> Result<ChartResponse, FetchCause> {
        let resp = self
            .http
            .get(self.url_for(query))
            .send()
            .await
            .map_err(|e| map_transport_err(&e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| map_transport_err(&e))?;
        if !status.is_success() {
            return Err(map_status(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| FetchCause::Decode(e.to_string()))
    }
}

#[cfg(feature = "test-adapters")]
impl dyn ChartApi {
    /// Build a `ChartApi` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn ChartApi>
    where
        F: Send + Sync + 'static + Fn(ChartQuery) -> Result<ChartResponse, FetchCause>,
    {
        struct FnChart<F>(F);
        #[async_trait]
        impl<F> ChartApi for FnChart<F>
        where
            F: Send + Sync + 'static + Fn(ChartQuery) -> Result<ChartResponse, FetchCause>,
        {
            async fn chart(&self, query: &ChartQuery) -> Result<ChartResponse, FetchCause> {
                (self.0)(query.clone())
            }
        }
        Arc::new(FnChart(f))
    }
}
