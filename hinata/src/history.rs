use std::sync::Arc;

use hinata_core::{
    AssetClass, FetchError, FetchRequest, NormalizeOptions, NormalizeReport, Normalized, Period,
    Series, SeriesKey, Timeframe, check_compatible, normalize_with, resample,
};
use hinata_middleware::CacheLookup;
use hinata_types::HinataError;

use crate::Hinata;

/// One chart request as the UI issues it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesRequest {
    /// Caller-facing symbol.
    pub symbol: String,
    /// Asset class of the symbol.
    pub asset_class: AssetClass,
    /// Requested bar size.
    pub timeframe: Timeframe,
    /// Requested window; may be adjusted before fetching.
    pub period: Period,
}

impl SeriesRequest {
    /// Build a request.
    pub fn new(
        symbol: impl Into<String>,
        asset_class: AssetClass,
        timeframe: Timeframe,
        period: Period,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            asset_class,
            timeframe,
            period,
        }
    }
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A fresh cache entry.
    Cache,
    /// A provider fetch made for this request.
    Provider,
}

/// Result of [`Hinata::history`].
#[derive(Debug, Clone)]
pub struct HistoryReport {
    /// The series, shared with the cache.
    pub series: Arc<Series>,
    /// Key the series is cached under (carries the effective period).
    pub key: SeriesKey,
    /// Cache hit or provider fetch.
    pub source: Source,
    /// Rows dropped while normalizing. Always clean for cache hits.
    pub warnings: NormalizeReport,
    /// Whether the requested period was clamped for the timeframe.
    pub period_adjusted: bool,
}

/// Clamp `period` to what providers accept for `timeframe`.
///
/// Minute bars over long windows, and weekly or monthly bars over a single
/// day, are replaced by a compatible window. Every adjustment is logged.
#[must_use]
pub fn adjust_period(timeframe: Timeframe, period: Period) -> (Period, bool) {
    let (adjusted, changed) = period.adjust_for(timeframe);
    #[cfg(feature = "tracing")]
    if changed {
        tracing::warn!(
            target: "hinata::history",
            %timeframe,
            requested = %period,
            effective = %adjusted,
            "period adjusted for timeframe"
        );
    }
    (adjusted, changed)
}

/// How a requested timeframe is obtained from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FetchPlan {
    /// Timeframe the provider is asked for.
    pub(crate) native: Timeframe,
    /// Resample the normalized series into the requested timeframe.
    pub(crate) resample: bool,
}

/// Pick the provider timeframe for `requested`.
///
/// Native support passes through. Otherwise the coarsest supported timeframe
/// that tiles the request is fetched and resampled (`4h` from `1h`, weekly
/// and monthly from `1d`).
pub(crate) fn plan_fetch(supported: &[Timeframe], requested: Timeframe) -> Result<FetchPlan, String> {
    if supported.contains(&requested) {
        return Ok(FetchPlan {
            native: requested,
            resample: false,
        });
    }
    supported
        .iter()
        .copied()
        .filter(|s| check_compatible(*s, requested).is_ok())
        .max()
        .map(|native| FetchPlan {
            native,
            resample: true,
        })
        .ok_or_else(|| format!("no provider timeframe can be resampled into {requested}"))
}

impl Hinata {
    /// Return the series for `req`, from the cache when fresh, else from the
    /// provider.
    ///
    /// The period is clamped for the timeframe first, so the cache key carries
    /// the effective period. On any error the cache is left untouched.
    ///
    /// # Errors
    /// - `Fetch` when the provider fails (after retries) or no provider
    ///   timeframe can produce the request.
    /// - `Validation` when the payload is structurally unusable.
    /// - `Resample` if the fetched series cannot be aggregated.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "hinata::history",
            skip(self, req),
            fields(
                symbol = %req.symbol,
                asset_class = %req.asset_class,
                timeframe = %req.timeframe,
                period = %req.period,
            ),
            err
        )
    )]
    pub async fn history(&self, req: &SeriesRequest) -> Result<HistoryReport, HinataError> {
        let (period, period_adjusted) = adjust_period(req.timeframe, req.period);
        let key = SeriesKey::new(req.symbol.clone(), req.timeframe, period);

        if self.cfg.coalesce_in_flight {
            let gate = self.cache.gate(&key).await;
            let result = {
                let _held = gate.lock().await;
                self.history_for_key(req, key.clone(), period_adjusted).await
            };
            self.cache.release_gate(&key, gate).await;
            result
        } else {
            self.history_for_key(req, key, period_adjusted).await
        }
    }

    /// [`history`](Self::history) with the configured default timeframe for
    /// the class and the default period.
    ///
    /// # Errors
    /// Same as [`history`](Self::history).
    pub async fn history_default(
        &self,
        symbol: &str,
        asset_class: AssetClass,
    ) -> Result<HistoryReport, HinataError> {
        let req = SeriesRequest::new(
            symbol,
            asset_class,
            self.cfg.default_timeframe(asset_class),
            self.cfg.default_period,
        );
        self.history(&req).await
    }

    async fn history_for_key(
        &self,
        req: &SeriesRequest,
        key: SeriesKey,
        period_adjusted: bool,
    ) -> Result<HistoryReport, HinataError> {
        if let CacheLookup::Hit(series) = self.cache.get(&key).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "hinata::cache", %key, candles = series.len(), "cache hit");
            return Ok(HistoryReport {
                series,
                key,
                source: Source::Cache,
                warnings: NormalizeReport::default(),
                period_adjusted,
            });
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "hinata::cache", %key, "cache miss");

        let plan = plan_fetch(self.fetcher.supported_timeframes(req.asset_class), req.timeframe)
            .map_err(|msg| FetchError::invalid(key.clone(), msg))?;
        let (fetch_period, narrowed) = if plan.resample {
            adjust_period(plan.native, key.period)
        } else {
            (key.period, false)
        };
        let fetch_req = FetchRequest::new(req.symbol.clone(), req.asset_class, plan.native, fetch_period);
        let raw = self.fetcher.fetch(&fetch_req).await?;

        let opts = NormalizeOptions {
            prefer_adjusted_close: self.cfg.prefer_adjusted_close,
        };
        let Normalized { series, report } =
            normalize_with(&raw, req.asset_class, plan.native, &opts)
                .map_err(|e| HinataError::validation(key.clone(), e))?;
        let series = if plan.resample {
            resample(&series, req.timeframe).map_err(|e| HinataError::resample(key.clone(), e))?
        } else {
            series
        };
        let series = Arc::new(series);

        if let Some(ttl) = self.cfg.cache.ttl_for(req.timeframe) {
            self.cache.put(key.clone(), Arc::clone(&series), ttl).await;
        }
        #[cfg(feature = "tracing")]
        tracing::info!(
            target: "hinata::history",
            %key,
            native = %plan.native,
            candles = series.len(),
            dropped = report.dropped_rows,
            duplicates = report.duplicate_rows,
            "fetched series"
        );

        Ok(HistoryReport {
            series,
            key,
            source: Source::Provider,
            warnings: report,
            period_adjusted: period_adjusted || narrowed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK: &[Timeframe] = &[
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::D1,
    ];

    #[test]
    fn native_timeframes_pass_through() {
        let plan = plan_fetch(MOCK, Timeframe::M15).unwrap();
        assert_eq!(plan.native, Timeframe::M15);
        assert!(!plan.resample);
    }

    #[test]
    fn four_hours_come_from_hourly() {
        let plan = plan_fetch(MOCK, Timeframe::H4).unwrap();
        assert_eq!(plan.native, Timeframe::H1);
        assert!(plan.resample);
    }

    #[test]
    fn calendar_timeframes_come_from_daily() {
        assert_eq!(plan_fetch(MOCK, Timeframe::W1).unwrap().native, Timeframe::D1);
        assert_eq!(plan_fetch(MOCK, Timeframe::Mo1).unwrap().native, Timeframe::D1);
        // Weeks do not tile months.
        assert_eq!(
            plan_fetch(&[Timeframe::W1], Timeframe::Mo1).unwrap_err(),
            "no provider timeframe can be resampled into 1mo"
        );
    }

    #[test]
    fn daily_without_native_daily_uses_coarsest_intraday() {
        let plan = plan_fetch(&[Timeframe::M5, Timeframe::M30], Timeframe::D1).unwrap();
        assert_eq!(plan.native, Timeframe::M30);
    }

    #[test]
    fn finer_than_anything_supported_fails() {
        assert!(plan_fetch(&[Timeframe::H1, Timeframe::D1], Timeframe::M5).is_err());
    }

    #[test]
    fn period_table() {
        let cases = [
            (Timeframe::M1, Period::Y1, Period::D5, true),
            (Timeframe::M5, Period::D7, Period::D7, false),
            (Timeframe::M15, Period::Mo6, Period::D60, true),
            (Timeframe::M30, Period::Mo1, Period::Mo1, false),
            (Timeframe::H1, Period::Y5, Period::D730, true),
            (Timeframe::H4, Period::Max, Period::D730, true),
            (Timeframe::H4, Period::Y1, Period::Y1, false),
            (Timeframe::W1, Period::D1, Period::Mo3, true),
            (Timeframe::Mo1, Period::D1, Period::Y2, true),
            (Timeframe::D1, Period::Max, Period::Max, false),
        ];
        for (tf, requested, want, changed) in cases {
            assert_eq!(adjust_period(tf, requested), (want, changed), "{tf} {requested}");
        }
    }
}
