use chrono::offset::{LocalResult, Offset};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use super::fieldmap::field_map;
use crate::types::{Candle, ResampleError, Series, Timeframe};

/// Check that `from` can be aggregated into `to`.
///
/// The target must be strictly coarser. Intraday targets must be a whole
/// multiple of the source; weeks do not tile months.
///
/// # Errors
/// `NotCoarser` when `to <= from`, `Misaligned` when buckets would not tile.
pub const fn check_compatible(from: Timeframe, to: Timeframe) -> Result<(), ResampleError> {
    if (to as u8) <= (from as u8) {
        return Err(ResampleError::NotCoarser { from, to });
    }
    let aligned = match (from.minutes(), to.minutes()) {
        (Some(f), Some(t)) => t % f == 0,
        _ => !matches!((from, to), (Timeframe::W1, Timeframe::Mo1)),
    };
    if aligned {
        Ok(())
    } else {
        Err(ResampleError::Misaligned { from, to })
    }
}

/// Aggregate sorted candles by a bucket function.
///
/// A candle whose bucket does not move forward is folded into the current
/// bucket so the output stays strictly increasing.
fn resample_by<F>(candles: &[Candle], bucket_of: F) -> Vec<Candle>
where
    F: Fn(DateTime<Utc>) -> Option<DateTime<Utc>>,
{
    let mut out: Vec<Candle> = Vec::new();
    let mut iter = candles.iter().filter_map(|c| bucket_of(c.ts).map(|b| (b, c)));
    let Some((first_bucket, first)) = iter.next() else {
        return out;
    };
    let mut cur = Candle {
        ts: first_bucket,
        ..*first
    };

    for (bucket, c) in iter {
        if bucket <= cur.ts {
            cur.high = cur.high.max(c.high);
            cur.low = cur.low.min(c.low);
            cur.close = c.close;
            cur.volume += c.volume;
        } else {
            out.push(cur);
            cur = Candle { ts: bucket, ..*c };
        }
    }
    out.push(cur);
    out
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn bucket_minutes_with_tz(ts: DateTime<Utc>, minutes: i64, tz: Tz) -> Option<DateTime<Utc>> {
    let step = minutes * 60;
    let local = ts.with_timezone(&tz);
    let since_midnight = i64::from(local.num_seconds_from_midnight());
    let bucket_sec = since_midnight - since_midnight.rem_euclid(step);
    let naive = local.date_naive().and_time(NaiveTime::MIN) + TimeDelta::seconds(bucket_sec);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, later) => {
            // Keep the offset of the source instant so both copies of a
            // repeated hour stay distinct.
            let offset = local.offset().fix().local_minus_utc();
            if earlier.offset().fix().local_minus_utc() == offset {
                Some(earlier.with_timezone(&Utc))
            } else {
                Some(later.with_timezone(&Utc))
            }
        }
        LocalResult::None => {
            let bucket = ts.timestamp() - ts.timestamp().rem_euclid(step);
            DateTime::from_timestamp(bucket, 0)
        }
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()))
}

fn month_start(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

/// Resample using the session timezone of the series' asset class.
///
/// # Errors
/// See [`check_compatible`].
pub fn resample(series: &Series, target: Timeframe) -> Result<Series, ResampleError> {
    resample_in(series, target, field_map(series.asset_class()).session_tz)
}

/// Aggregate `series` into `target` buckets.
///
/// - Open is the first open, close the last close, high the max, low the min,
///   volume the sum.
/// - Buckets are left-labelled. Intraday buckets are aligned to local
///   midnight in `tz`. Daily, weekly (Monday) and monthly buckets follow the
///   session date in `tz` and are stamped at 00:00 UTC of their first day.
/// - Sources that are already daily or coarser carry session dates, so `tz` is
///   not applied to them again.
/// - Empty buckets are omitted and an empty series resamples to empty.
///
/// # Errors
/// See [`check_compatible`].
///
/// ```
/// use chrono::{DateTime, Utc};
/// use hinata_core::{AssetClass, Candle, Series, Timeframe, resample};
///
/// let hourly: Vec<Candle> = (0..24)
///     .map(|h| Candle {
///         ts: DateTime::from_timestamp(h * 3600, 0).unwrap(),
///         open: 1.0,
///         high: 2.0,
///         low: 0.5,
///         close: 1.5,
///         volume: 10.0,
///     })
///     .collect();
/// let series = Series::new("BTC-USD", AssetClass::Crypto, Timeframe::H1, hourly).unwrap();
/// let daily = resample(&series, Timeframe::D1).unwrap();
/// assert_eq!(daily.len(), 1);
/// assert_eq!(daily.candles()[0].volume, 240.0);
/// ```
pub fn resample_in(series: &Series, target: Timeframe, tz: Tz) -> Result<Series, ResampleError> {
    let source = series.timeframe();
    check_compatible(source, target)?;

    let session_date = |ts: DateTime<Utc>| {
        if source.is_intraday() {
            ts.with_timezone(&tz).date_naive()
        } else {
            ts.date_naive()
        }
    };
    let candles = match target.minutes() {
        Some(minutes) => resample_by(series.candles(), |ts| bucket_minutes_with_tz(ts, minutes, tz)),
        None => match target {
            Timeframe::W1 => resample_by(series.candles(), |ts| {
                Some(midnight_utc(week_start(session_date(ts))))
            }),
            Timeframe::Mo1 => resample_by(series.candles(), |ts| {
                month_start(session_date(ts)).map(midnight_utc)
            }),
            _ => resample_by(series.candles(), |ts| Some(midnight_utc(session_date(ts)))),
        },
    };

    Ok(Series::from_checked(
        series.symbol(),
        series.asset_class(),
        target,
        candles,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssetClass;

    const DAY: i64 = 86_400;

    fn candle(sec: i64, o: f64, h: f64, l: f64, c: f64, v: f64) -> Candle {
        Candle {
            ts: DateTime::from_timestamp(sec, 0).unwrap(),
            open: o,
            high: h,
            low: l,
            close: c,
            volume: v,
        }
    }

    fn series(class: AssetClass, tf: Timeframe, candles: Vec<Candle>) -> Series {
        Series::new("T", class, tf, candles).unwrap()
    }

    #[test]
    fn compatibility_rules() {
        use Timeframe::*;
        assert!(check_compatible(M1, M5).is_ok());
        assert!(check_compatible(H1, H4).is_ok());
        assert!(check_compatible(M15, D1).is_ok());
        assert!(check_compatible(D1, Mo1).is_ok());
        assert_eq!(
            check_compatible(D1, H1),
            Err(ResampleError::NotCoarser { from: D1, to: H1 })
        );
        assert_eq!(
            check_compatible(H1, H1),
            Err(ResampleError::NotCoarser { from: H1, to: H1 })
        );
        assert_eq!(
            check_compatible(W1, Mo1),
            Err(ResampleError::Misaligned { from: W1, to: Mo1 })
        );
    }

    #[test]
    fn twenty_four_hours_make_one_day() {
        let hourly: Vec<Candle> = (0..24)
            .map(|h| {
                let p = 100.0 + h as f64;
                candle(h * 3600, p, p + 1.0, p - 1.0, p + 0.5, 2.0)
            })
            .collect();
        let s = series(AssetClass::Crypto, Timeframe::H1, hourly);
        let daily = resample(&s, Timeframe::D1).unwrap();
        assert_eq!(daily.len(), 1);
        let d = daily.candles()[0];
        assert_eq!(d.ts.timestamp(), 0);
        assert_eq!(d.open, 100.0);
        assert_eq!(d.close, 123.5);
        assert_eq!(d.high, 124.0);
        assert_eq!(d.low, 99.0);
        assert_eq!(d.volume, 48.0);
        assert_eq!(daily.timeframe(), Timeframe::D1);
    }

    #[test]
    fn four_hour_buckets_from_hourly() {
        let hourly: Vec<Candle> = (0..10)
            .map(|h| candle(h * 3600, 1.0, 2.0, 0.5, 1.5, 1.0))
            .collect();
        let s = series(AssetClass::Crypto, Timeframe::H1, hourly);
        let out = resample(&s, Timeframe::H4).unwrap();
        let stamps: Vec<i64> = out.candles().iter().map(|c| c.ts.timestamp()).collect();
        assert_eq!(stamps, vec![0, 4 * 3600, 8 * 3600]);
        let vols: Vec<f64> = out.candles().iter().map(|c| c.volume).collect();
        assert_eq!(vols, vec![4.0, 4.0, 2.0]);
    }

    #[test]
    fn equity_intraday_days_follow_new_york() {
        // 2024-01-02 20:00 UTC is 15:00 in New York, 2024-01-03 01:00 UTC is 20:00.
        let jan2_20 = 1_704_225_600;
        let s = series(
            AssetClass::Equity,
            Timeframe::H1,
            vec![
                candle(jan2_20, 1.0, 1.0, 1.0, 1.0, 1.0),
                candle(jan2_20 + 5 * 3600, 2.0, 2.0, 2.0, 2.0, 1.0),
            ],
        );
        let daily = resample(&s, Timeframe::D1).unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(
            daily.candles()[0].ts.date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        let utc_daily = resample_in(&s, Timeframe::D1, chrono_tz::UTC).unwrap();
        assert_eq!(utc_daily.len(), 2);
    }

    #[test]
    fn daily_to_weekly_and_monthly() {
        // 2024-01-01 is a Monday.
        let jan1 = 1_704_067_200;
        let days: Vec<Candle> = (0..40)
            .map(|d| candle(jan1 + d * DAY, 1.0, 2.0, 0.5, 1.0, 1.0))
            .collect();
        let s = series(AssetClass::Equity, Timeframe::D1, days);

        let weekly = resample(&s, Timeframe::W1).unwrap();
        assert_eq!(weekly.len(), 6);
        assert!(
            weekly
                .candles()
                .iter()
                .all(|c| c.ts.weekday() == chrono::Weekday::Mon)
        );
        assert_eq!(weekly.candles()[0].volume, 7.0);

        let monthly = resample(&s, Timeframe::Mo1).unwrap();
        let vols: Vec<f64> = monthly.candles().iter().map(|c| c.volume).collect();
        assert_eq!(vols, vec![31.0, 9.0]);
        assert_eq!(monthly.candles()[1].ts.day(), 1);
    }

    #[test]
    fn fall_back_hour_stays_distinct() {
        // 2024-11-03 05:30 and 06:30 UTC are both 01:30 in New York.
        let first = 1_730_611_800;
        let s = series(
            AssetClass::Equity,
            Timeframe::M30,
            vec![
                candle(first, 1.0, 1.0, 1.0, 1.0, 1.0),
                candle(first + 3600, 2.0, 2.0, 2.0, 2.0, 1.0),
            ],
        );
        let hourly = resample(&s, Timeframe::H1).unwrap();
        assert_eq!(hourly.len(), 2);
        assert!(hourly.candles()[0].ts < hourly.candles()[1].ts);
    }

    #[test]
    fn empty_resamples_to_empty() {
        let s = Series::empty("T", AssetClass::Forex, Timeframe::H1);
        let out = resample(&s, Timeframe::D1).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.timeframe(), Timeframe::D1);
    }
}
