use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use hinata_core::{AssetClass, Candle, ResampleError, Series, Timeframe, resample, resample_in};
use proptest::prelude::*;

// 2024-01-01T00:00:00Z, a Monday.
const BASE: i64 = 1_704_067_200;

fn arb_candle() -> impl Strategy<Value = Candle> {
    // Coherent OHLC in whole cents so sums and extremes compare exactly.
    (
        0i64..60 * 24 * 40,
        1i64..100_000,
        1i64..100_000,
        1i64..100_000,
        1i64..100_000,
        0u32..1_000_000,
    )
        .prop_map(|(minute, o, h, l, c, vol)| {
            let open = o as f64 / 100.0;
            let close = c as f64 / 100.0;
            let high = (h as f64 / 100.0).max(open).max(close);
            let low = (l as f64 / 100.0).min(open).min(close);
            Candle {
                ts: DateTime::from_timestamp(BASE + minute * 60, 0).unwrap(),
                open,
                high,
                low,
                close,
                volume: f64::from(vol),
            }
        })
}

fn arb_series(class: AssetClass) -> impl Strategy<Value = Series> {
    proptest::collection::vec(arb_candle(), 0..300).prop_map(move |mut candles| {
        candles.sort_by_key(|c| c.ts);
        candles.dedup_by_key(|c| c.ts);
        Series::new("PROP", class, Timeframe::M1, candles).unwrap()
    })
}

fn total_volume(s: &Series) -> f64 {
    s.candles().iter().map(|c| c.volume).sum()
}

proptest! {
    #[test]
    fn output_is_a_valid_series(
        series in arb_series(AssetClass::Equity),
        target in prop::sample::select(vec![
            Timeframe::M5, Timeframe::M15, Timeframe::M30, Timeframe::H1,
            Timeframe::H4, Timeframe::D1, Timeframe::W1, Timeframe::Mo1,
        ])
    ) {
        let out = resample(&series, target).unwrap();
        prop_assert_eq!(out.timeframe(), target);
        prop_assert!(out.len() <= series.len());
        prop_assert_eq!(out.is_empty(), series.is_empty());
        let rebuilt = Series::new("PROP", AssetClass::Equity, target, out.candles().to_vec());
        prop_assert!(rebuilt.is_ok());
        prop_assert_eq!(total_volume(&out), total_volume(&series));
    }

    #[test]
    fn minute_buckets_match_model(
        series in arb_series(AssetClass::Crypto),
        target in prop::sample::select(vec![Timeframe::M5, Timeframe::M15, Timeframe::H1, Timeframe::H4])
    ) {
        let step = target.minutes().unwrap() * 60;
        let mut groups: BTreeMap<i64, Vec<Candle>> = BTreeMap::new();
        for c in series.candles() {
            let b = c.ts.timestamp() - c.ts.timestamp().rem_euclid(step);
            groups.entry(b).or_default().push(*c);
        }

        let out = resample_in(&series, target, chrono_tz::UTC).unwrap();
        prop_assert_eq!(out.len(), groups.len());
        for (rc, (b, group)) in out.candles().iter().zip(groups) {
            prop_assert_eq!(rc.ts.timestamp(), b);
            prop_assert_eq!(rc.open, group[0].open);
            prop_assert_eq!(rc.close, group[group.len() - 1].close);
            prop_assert_eq!(rc.high, group.iter().map(|c| c.high).fold(f64::MIN, f64::max));
            prop_assert_eq!(rc.low, group.iter().map(|c| c.low).fold(f64::MAX, f64::min));
        }
    }

    #[test]
    fn resampling_composes(series in arb_series(AssetClass::Crypto)) {
        let direct = resample(&series, Timeframe::H1).unwrap();
        let stepped = resample(&resample(&series, Timeframe::M5).unwrap(), Timeframe::H1).unwrap();
        prop_assert_eq!(direct.candles(), stepped.candles());

        let daily = resample(&series, Timeframe::D1).unwrap();
        let via_hours = resample(&direct, Timeframe::D1).unwrap();
        prop_assert_eq!(daily.candles(), via_hours.candles());
    }

    #[test]
    fn calendar_buckets_are_midnight_utc(
        series in arb_series(AssetClass::Equity),
        target in prop::sample::select(vec![Timeframe::D1, Timeframe::W1, Timeframe::Mo1])
    ) {
        let out = resample(&series, target).unwrap();
        for c in out.candles() {
            prop_assert_eq!(c.ts.num_seconds_from_midnight(), 0);
            match target {
                Timeframe::W1 => prop_assert_eq!(c.ts.weekday(), chrono::Weekday::Mon),
                Timeframe::Mo1 => prop_assert_eq!(c.ts.day(), 1),
                _ => {}
            }
        }
    }

    #[test]
    fn finer_target_is_rejected(series in arb_series(AssetClass::Forex)) {
        let daily = resample(&series, Timeframe::D1).unwrap();
        prop_assert_eq!(
            resample(&daily, Timeframe::H1).unwrap_err(),
            ResampleError::NotCoarser { from: Timeframe::D1, to: Timeframe::H1 }
        );
        prop_assert_eq!(
            resample(&daily, Timeframe::D1).unwrap_err(),
            ResampleError::NotCoarser { from: Timeframe::D1, to: Timeframe::D1 }
        );
    }
}

#[test]
fn utc_stamp_of_daily_bucket_is_session_date() {
    let ts = |s: i64| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
    // 2024-01-03 03:00 UTC is still 2024-01-02 in New York.
    let c = Candle {
        ts: ts(BASE + 2 * 86_400 + 3 * 3600),
        open: 1.0,
        high: 1.0,
        low: 1.0,
        close: 1.0,
        volume: 1.0,
    };
    let s = Series::new("AAPL", AssetClass::Equity, Timeframe::H1, vec![c]).unwrap();
    let d = resample(&s, Timeframe::D1).unwrap();
    assert_eq!(d.candles()[0].ts, ts(BASE + 86_400));
}
