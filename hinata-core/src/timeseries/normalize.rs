use chrono::offset::LocalResult;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::fieldmap::{FieldMap, VolumeField, field_map};
use crate::types::{
    AssetClass, Candle, NormalizeReport, RawPayload, RawTimestamp, Series, Timeframe,
    ValidationError,
};

/// Knobs for [`normalize_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Scale OHLC by `adjclose / close` when the class maps an adjusted close
    /// column and the payload carries it.
    pub prefer_adjusted_close: bool,
}

/// A canonical series plus the non-fatal report of what was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Valid, sorted, de-duplicated candles.
    pub series: Series,
    /// Row accounting.
    pub report: NormalizeReport,
}

#[derive(Debug, Clone, Copy)]
enum SessionZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl SessionZone {
    fn resolve(raw: &RawPayload, map: &FieldMap) -> Result<Self, ValidationError> {
        if let Some(name) = raw.timezone.as_deref() {
            return name
                .parse::<Tz>()
                .map(Self::Named)
                .map_err(|_| ValidationError::UnknownTimezone(name.to_string()));
        }
        if let Some(off) = raw.utc_offset_seconds {
            return FixedOffset::east_opt(off)
                .map(Self::Fixed)
                .ok_or_else(|| ValidationError::UnknownTimezone(format!("UTC{off:+}s")));
        }
        Ok(Self::Named(map.session_tz))
    }

    fn local_to_utc(self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self {
            Self::Named(tz) => local_to_utc(&tz, naive),
            Self::Fixed(off) => local_to_utc(&off, naive),
        }
    }

    fn session_date(self, ts: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Named(tz) => ts.with_timezone(&tz).date_naive(),
            Self::Fixed(off) => ts.with_timezone(&off).date_naive(),
        }
    }
}

fn local_to_utc<Z: TimeZone>(zone: &Z, naive: NaiveDateTime) -> DateTime<Utc> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        LocalResult::None => {
            // Spring-forward gap: the wall-clock time does not exist.
            zone.from_local_datetime(&(naive + TimeDelta::hours(1)))
                .earliest()
                .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc))
        }
    }
}

/// `None` for an epoch chrono cannot represent.
fn to_utc(raw: RawTimestamp, zone: SessionZone, timeframe: Timeframe) -> Option<DateTime<Utc>> {
    let instant = match raw {
        RawTimestamp::Epoch(secs) => DateTime::from_timestamp(secs, 0)?,
        RawTimestamp::Local(naive) => zone.local_to_utc(naive),
    };
    if timeframe.is_intraday() {
        return Some(instant);
    }
    // Daily and coarser bars are labelled by session date at 00:00 UTC.
    Some(
        zone.session_date(instant)
            .and_time(NaiveTime::MIN)
            .and_utc(),
    )
}

fn column<'a>(
    raw: &'a RawPayload,
    name: &str,
    rows: usize,
) -> Result<Option<&'a [Option<f64>]>, ValidationError> {
    let Some(values) = raw.columns.get(name) else {
        return Ok(None);
    };
    if values.len() != rows {
        return Err(ValidationError::LengthMismatch {
            column: name.to_string(),
            expected: rows,
            actual: values.len(),
        });
    }
    Ok(Some(values.as_slice()))
}

fn required<'a>(
    raw: &'a RawPayload,
    name: &str,
    rows: usize,
) -> Result<&'a [Option<f64>], ValidationError> {
    column(raw, name, rows)?.ok_or_else(|| ValidationError::MissingColumn {
        symbol: raw.symbol.clone(),
        column: name.to_string(),
    })
}

struct Columns<'a> {
    open: &'a [Option<f64>],
    high: &'a [Option<f64>],
    low: &'a [Option<f64>],
    close: &'a [Option<f64>],
    adjusted: Option<&'a [Option<f64>]>,
    volume: Option<&'a [Option<f64>]>,
    volume_required: bool,
}

impl Columns<'_> {
    fn candle(&self, i: usize, ts: DateTime<Utc>) -> Option<Candle> {
        let (mut open, mut high, mut low, mut close) =
            (self.open[i]?, self.high[i]?, self.low[i]?, self.close[i]?);
        let volume = match self.volume {
            Some(col) if self.volume_required => col[i]?,
            Some(col) => col[i].unwrap_or(0.0),
            None => 0.0,
        };
        if let Some(adj) = self.adjusted.and_then(|col| col[i])
            && close.is_finite()
            && close > 0.0
        {
            let ratio = adj / close;
            open *= ratio;
            close = adj;
            // Scaling rounds; a bar whose low or high sat on the close must still bound it.
            high = (high * ratio).max(open.max(close));
            low = (low * ratio).min(open.min(close));
        }
        Some(Candle {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Convert a provider payload into the canonical schema.
///
/// Equivalent to [`normalize_with`] with default options.
///
/// # Errors
/// Returns `ValidationError` when the payload is structurally unusable.
pub fn normalize(
    raw: &RawPayload,
    asset_class: AssetClass,
    timeframe: Timeframe,
) -> Result<Normalized, ValidationError> {
    normalize_with(raw, asset_class, timeframe, &NormalizeOptions::default())
}

/// Convert a provider payload into the canonical schema.
///
/// - Columns are located through the asset class [`FieldMap`].
/// - Timestamps become UTC. Local wall-clock stamps are resolved in the
///   payload's zone (IANA name, then fixed offset, then the class default).
///   Daily and coarser bars are labelled with their session date at midnight UTC.
/// - Rows with missing, non-finite or OHLC-inconsistent values, or with an
///   epoch outside the representable range, are dropped and counted in the
///   report.
/// - Output is sorted ascending; for repeated timestamps the last row wins.
///
/// An empty payload yields an empty series.
///
/// # Errors
/// Returns `ValidationError` for a missing required column, a column whose
/// length differs from the timestamps, or an unknown timezone.
pub fn normalize_with(
    raw: &RawPayload,
    asset_class: AssetClass,
    timeframe: Timeframe,
    opts: &NormalizeOptions,
) -> Result<Normalized, ValidationError> {
    let rows = raw.len();
    if rows == 0 {
        return Ok(Normalized {
            series: Series::empty(raw.symbol.clone(), asset_class, timeframe),
            report: NormalizeReport::default(),
        });
    }

    let map = field_map(asset_class);
    let zone = SessionZone::resolve(raw, map)?;

    let adjusted = match map.adjusted_close {
        Some(name) if opts.prefer_adjusted_close => column(raw, name, rows)?,
        _ => None,
    };
    let volume = match map.volume {
        VolumeField::Required(name) => Some(required(raw, name, rows)?),
        VolumeField::Optional(name) => column(raw, name, rows)?,
    };
    let cols = Columns {
        open: required(raw, map.open, rows)?,
        high: required(raw, map.high, rows)?,
        low: required(raw, map.low, rows)?,
        close: required(raw, map.close, rows)?,
        adjusted,
        volume,
        volume_required: matches!(map.volume, VolumeField::Required(_)),
    };

    let mut kept: Vec<Candle> = Vec::with_capacity(rows);
    let mut dropped_rows = 0usize;
    for (i, raw_ts) in raw.timestamps.iter().enumerate() {
        let candle = to_utc(*raw_ts, zone, timeframe).and_then(|ts| cols.candle(i, ts));
        match candle {
            Some(c) if c.is_valid() => kept.push(c),
            _ => dropped_rows += 1,
        }
    }

    // Stable sort keeps provider order among equal stamps, so "last wins" below
    // means last seen in the payload.
    kept.sort_by_key(|c| c.ts);
    let mut candles: Vec<Candle> = Vec::with_capacity(kept.len());
    let mut duplicate_rows = 0usize;
    for c in kept {
        match candles.last_mut() {
            Some(last) if last.ts == c.ts => {
                *last = c;
                duplicate_rows += 1;
            }
            _ => candles.push(c),
        }
    }

    let report = NormalizeReport {
        input_rows: rows,
        dropped_rows,
        duplicate_rows,
    };
    #[cfg(feature = "tracing")]
    if !report.is_clean() {
        tracing::warn!(
            target: "hinata::normalize",
            symbol = %raw.symbol,
            asset_class = %asset_class,
            timeframe = %timeframe,
            dropped = report.dropped_rows,
            duplicates = report.duplicate_rows,
            "dropped rows while normalizing"
        );
    }

    Ok(Normalized {
        series: Series::from_checked(raw.symbol.clone(), asset_class, timeframe, candles),
        report,
    })
}
