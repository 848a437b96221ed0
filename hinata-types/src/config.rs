//! Configuration types shared by the orchestrator, cache and fetchers.
//!
//! Loading these from files or the environment is left to the embedding
//! application; every type here deserializes with serde and has a usable
//! `Default`.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::asset_class::AssetClass;
use crate::period::Period;
use crate::timeframe::Timeframe;

/// Freshness policy for cached series.
///
/// TTLs are a function of timeframe granularity: minute bars go stale quickly,
/// monthly bars barely move.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch. When false nothing is cached.
    pub enabled: bool,
    /// Per-timeframe overrides keyed by timeframe code (`"1m"`, `"1d"`, ...).
    /// Timeframes not listed use [`builtin_ttl`](Self::builtin_ttl).
    /// A value of 0 disables caching for that timeframe.
    pub per_timeframe_ttl_ms: HashMap<String, u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_timeframe_ttl_ms: HashMap::new(),
        }
    }
}

impl CacheConfig {
    /// Built-in TTL for a timeframe.
    #[must_use]
    pub const fn builtin_ttl(timeframe: Timeframe) -> Duration {
        match timeframe {
            Timeframe::M1 | Timeframe::M5 => Duration::from_secs(60),
            Timeframe::M15 | Timeframe::M30 => Duration::from_secs(5 * 60),
            Timeframe::H1 | Timeframe::H4 => Duration::from_secs(15 * 60),
            Timeframe::D1 => Duration::from_secs(60 * 60),
            Timeframe::W1 | Timeframe::Mo1 => Duration::from_secs(6 * 60 * 60),
        }
    }

    /// Effective TTL for `timeframe`; `None` means "do not cache".
    #[must_use]
    pub fn ttl_for(&self, timeframe: Timeframe) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let ttl = self
            .per_timeframe_ttl_ms
            .get(timeframe.as_str())
            .map_or_else(|| Self::builtin_ttl(timeframe), |ms| Duration::from_millis(*ms));
        (!ttl.is_zero()).then_some(ttl)
    }

    /// Override the TTL of one timeframe.
    #[must_use]
    pub fn with_ttl(mut self, timeframe: Timeframe, ttl: Duration) -> Self {
        self.per_timeframe_ttl_ms.insert(
            timeframe.as_str().to_string(),
            u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        );
        self
    }
}

/// Exponential backoff configuration for retried provider calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Minimum backoff delay in milliseconds.
    pub min_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor to increase delay after each failure (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff_ms: 250,
            max_backoff_ms: 5_000,
            factor: 2,
            jitter_percent: 20,
        }
    }
}

impl BackoffConfig {
    /// Delay before retry number `attempt` (1-based), without jitter.
    #[must_use]
    pub fn base_delay_ms(&self, attempt: u32) -> u64 {
        let factor = u64::from(self.factor.max(1));
        let exp = factor.saturating_pow(attempt.saturating_sub(1));
        self.min_backoff_ms
            .saturating_mul(exp)
            .min(self.max_backoff_ms.max(self.min_backoff_ms))
    }
}

/// Bounded retry policy for transient provider failures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one. `1` disables retries.
    pub max_attempts: u32,
    /// Timeout applied to each attempt.
    pub attempt_timeout: Duration,
    /// Delay schedule between attempts.
    pub backoff: BackoffConfig,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(10),
            backoff: BackoffConfig::default(),
        }
    }
}

/// Symbols offered per asset class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCatalog(pub BTreeMap<AssetClass, Vec<String>>);

impl Default for SymbolCatalog {
    fn default() -> Self {
        let to_vec = |xs: &[&str]| xs.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        let mut map = BTreeMap::new();
        map.insert(
            AssetClass::Equity,
            to_vec(&[
                "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "NFLX", "AMD", "CRM",
            ]),
        );
        map.insert(
            AssetClass::Crypto,
            to_vec(&[
                "BTC-USD",
                "ETH-USD",
                "ADA-USD",
                "DOT-USD",
                "LINK-USD",
                "MATIC-USD",
                "SOL-USD",
                "AVAX-USD",
                "ATOM-USD",
                "ALGO-USD",
            ]),
        );
        map.insert(
            AssetClass::Forex,
            to_vec(&["EURUSD=X", "GBPUSD=X", "USDJPY=X", "AUDUSD=X", "USDCAD=X"]),
        );
        Self(map)
    }
}

impl SymbolCatalog {
    /// Symbols for one asset class (empty when none are configured).
    #[must_use]
    pub fn symbols(&self, class: AssetClass) -> &[String] {
        self.0.get(&class).map_or(&[], Vec::as_slice)
    }

    /// The asset class a symbol is listed under, if any.
    #[must_use]
    pub fn class_of(&self, symbol: &str) -> Option<AssetClass> {
        self.0
            .iter()
            .find(|(_, syms)| syms.iter().any(|s| s.eq_ignore_ascii_case(symbol)))
            .map(|(class, _)| *class)
    }
}

/// Overlay parameters handed through to the chart renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOverlay {
    /// Moving-average window lengths, fastest first.
    pub moving_average_windows: Vec<usize>,
}

impl Default for ChartOverlay {
    fn default() -> Self {
        Self {
            moving_average_windows: vec![20, 50],
        }
    }
}

/// Global configuration for the `Hinata` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HinataConfig {
    /// Symbols offered per asset class.
    pub catalog: SymbolCatalog,
    /// Timeframe used when the caller does not pick one.
    pub default_timeframes: BTreeMap<AssetClass, Timeframe>,
    /// Period used when the caller does not pick one.
    pub default_period: Period,
    /// Cache freshness policy.
    pub cache: CacheConfig,
    /// Retry policy for the provider.
    pub retry: RetryConfig,
    /// Use the adjusted close column when the provider supplies one.
    pub prefer_adjusted_close: bool,
    /// Serialize concurrent requests for the same key so only one fetch runs.
    pub coalesce_in_flight: bool,
    /// Renderer overlay parameters.
    pub overlay: ChartOverlay,
}

impl Default for HinataConfig {
    fn default() -> Self {
        Self {
            catalog: SymbolCatalog::default(),
            default_timeframes: AssetClass::ALL
                .into_iter()
                .map(|c| (c, Timeframe::D1))
                .collect(),
            default_period: Period::Y1,
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
            prefer_adjusted_close: false,
            coalesce_in_flight: false,
            overlay: ChartOverlay::default(),
        }
    }
}

impl HinataConfig {
    /// Default timeframe for `class`, falling back to daily.
    #[must_use]
    pub fn default_timeframe(&self, class: AssetClass) -> Timeframe {
        self.default_timeframes
            .get(&class)
            .copied()
            .unwrap_or(Timeframe::D1)
    }
}
