//! Deterministic synthetic market data.
//!
//! Every series ends at the close of 2024-12-31 so tests can reason about
//! exact bar counts. Prices are smooth functions of the bar timestamp, so the
//! same bar has the same values whatever window it was requested with.

mod calendar;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use hinata_core::{Period, RawPayload, RawTimestamp, Timeframe};

pub use calendar::is_nyse_session;

// Upper bound on generated rows per payload.
const MAX_ROWS: usize = 20_000;

/// Trading-hours convention of a fixture instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    /// 09:30-16:00 New York, NYSE sessions, local wall-clock stamps.
    NewYork,
    /// 24/7, epoch stamps.
    Crypto,
    /// 24/5 (UTC weekdays), epoch stamps, no volume.
    Forex,
}

/// One fixture instrument.
#[derive(Debug, Clone, Copy)]
pub struct Instrument {
    /// Symbol the mock answers to.
    pub symbol: &'static str,
    /// Trading-hours convention.
    pub venue: Venue,
    /// Price level the series oscillates around.
    pub base_price: f64,
    /// Typical daily volume.
    pub base_volume: f64,
}

const INSTRUMENTS: &[Instrument] = &[
    Instrument { symbol: "AAPL", venue: Venue::NewYork, base_price: 185.0, base_volume: 55_000_000.0 },
    Instrument { symbol: "MSFT", venue: Venue::NewYork, base_price: 375.0, base_volume: 22_000_000.0 },
    Instrument { symbol: "FLAKY", venue: Venue::NewYork, base_price: 42.0, base_volume: 1_000_000.0 },
    Instrument { symbol: "BTC-USD", venue: Venue::Crypto, base_price: 42_000.0, base_volume: 25_000.0 },
    Instrument { symbol: "ETH-USD", venue: Venue::Crypto, base_price: 2_300.0, base_volume: 300_000.0 },
    Instrument { symbol: "EURUSD=X", venue: Venue::Forex, base_price: 1.09, base_volume: 0.0 },
    Instrument { symbol: "GBPUSD=X", venue: Venue::Forex, base_price: 1.27, base_volume: 0.0 },
];

/// Fixture for `symbol`, if the mock knows it.
#[must_use]
pub fn by_symbol(symbol: &str) -> Option<&'static Instrument> {
    INSTRUMENTS.iter().find(|i| i.symbol == symbol)
}

fn last_session() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 12, 31)
}

fn wave(base: f64, x: f64) -> f64 {
    base * (1.0 + 0.08 * (x / 40.0).sin() + 0.02 * (x / 7.0).cos())
}

struct Columns {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
    adjclose: Vec<Option<f64>>,
}

impl Columns {
    fn with_capacity(n: usize) -> Self {
        Self {
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
            volume: Vec::with_capacity(n),
            adjclose: Vec::with_capacity(n),
        }
    }

    // `at` is seconds since the epoch of the bar start, `width` the bar length.
    fn push(&mut self, inst: &Instrument, at: i64, width_minutes: i64) {
        let x = at as f64 / 21_600.0;
        let step = width_minutes as f64 / 360.0;
        let open = wave(inst.base_price, x);
        let close = wave(inst.base_price, x + step);
        let spread = 0.002 + 0.001 * (x * 3.0).sin().abs();
        let high = open.max(close) * (1.0 + spread);
        let low = open.min(close) * (1.0 - spread);
        let shape = ((at / 60).rem_euclid(97)) as f64 / 97.0;
        let share = (width_minutes as f64 / 1_440.0).min(1.0);
        self.open.push(Some(open));
        self.high.push(Some(high));
        self.low.push(Some(low));
        self.close.push(Some(close));
        self.volume
            .push(Some((inst.base_volume * share * (0.8 + 0.4 * shape)).round()));
        self.adjclose.push(Some(close * 0.995));
    }
}

fn new_york_stamps(timeframe: Timeframe, first: NaiveDate, last: NaiveDate) -> Vec<NaiveDateTime> {
    let (Some(open), Some(close)) = (
        NaiveTime::from_hms_opt(9, 30, 0),
        NaiveTime::from_hms_opt(16, 0, 0),
    ) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for date in first.iter_days().take_while(|d| *d <= last) {
        if !is_nyse_session(date) {
            continue;
        }
        match timeframe.minutes() {
            None => out.push(date.and_time(open)),
            Some(m) => {
                let mut t = date.and_time(open);
                while t < date.and_time(close) {
                    out.push(t);
                    t += TimeDelta::minutes(m);
                }
            }
        }
    }
    out
}

fn round_the_clock_stamps(
    timeframe: Timeframe,
    first: NaiveDate,
    last: NaiveDate,
    weekdays_only: bool,
) -> Vec<i64> {
    let width = timeframe.minutes().unwrap_or(1_440) * 60;
    let mut out = Vec::new();
    for date in first.iter_days().take_while(|d| *d <= last) {
        if weekdays_only && calendar::is_weekend(date) {
            continue;
        }
        let day_start = date.and_time(NaiveTime::MIN);
        if timeframe.is_intraday() {
            let start = day_start.and_utc().timestamp();
            out.extend((0..86_400 / width).map(|k| start + k * width));
        } else if weekdays_only {
            // FX daily bars open at London midnight.
            if let Some(dt) = chrono_tz::Europe::London
                .from_local_datetime(&day_start)
                .earliest()
            {
                out.push(dt.timestamp());
            }
        } else {
            out.push(day_start.and_utc().timestamp());
        }
    }
    out
}

/// Build the payload `inst` would return for `timeframe` over `period`.
///
/// The window covers the `period.days()` calendar days ending 2024-12-31.
#[must_use]
pub fn generate(inst: &Instrument, symbol: &str, timeframe: Timeframe, period: Period) -> RawPayload {
    let Some(last) = last_session() else {
        return RawPayload::new(symbol);
    };
    let first = last - TimeDelta::days(i64::from(period.days()) - 1);
    let width = timeframe.minutes().unwrap_or(1_440);

    let (timezone, stamps): (&str, Vec<(RawTimestamp, i64)>) = match inst.venue {
        Venue::NewYork => (
            "America/New_York",
            new_york_stamps(timeframe, first, last)
                .into_iter()
                .map(|t| (RawTimestamp::Local(t), t.and_utc().timestamp()))
                .collect(),
        ),
        Venue::Crypto => (
            "UTC",
            round_the_clock_stamps(timeframe, first, last, false)
                .into_iter()
                .map(|s| (RawTimestamp::Epoch(s), s))
                .collect(),
        ),
        Venue::Forex => (
            "Europe/London",
            round_the_clock_stamps(timeframe, first, last, true)
                .into_iter()
                .map(|s| (RawTimestamp::Epoch(s), s))
                .collect(),
        ),
    };
    let skip = stamps.len().saturating_sub(MAX_ROWS);
    let stamps = &stamps[skip..];

    let mut cols = Columns::with_capacity(stamps.len());
    for (_, at) in stamps {
        cols.push(inst, *at, width);
    }

    let payload = RawPayload::new(symbol)
        .with_timezone(timezone)
        .with_timestamps(stamps.iter().map(|(t, _)| *t).collect())
        .with_column("open", cols.open)
        .with_column("high", cols.high)
        .with_column("low", cols.low)
        .with_column("close", cols.close);
    match inst.venue {
        Venue::NewYork => payload
            .with_column("volume", cols.volume)
            .with_column("adjclose", cols.adjclose),
        Venue::Crypto => payload.with_column("volume", cols.volume),
        Venue::Forex => payload,
    }
}
