use hinata_core::{FetchCause, RawPayload, RawTimestamp};

use crate::wire::ChartResponse;

/// Turn a chart document into a payload labeled with the caller's `symbol`.
pub(crate) fn into_payload(resp: ChartResponse, symbol: &str) -> Result<RawPayload, FetchCause> {
    if let Some(err) = resp.chart.error {
        return Err(if err.is_not_found() {
            FetchCause::NotFound
        } else {
            FetchCause::Rejected(err.message().to_string())
        });
    }
    let Some(result) = resp.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(FetchCause::NotFound);
    };

    let mut payload = RawPayload::new(symbol);
    if let Some(tz) = result.meta.exchange_timezone_name {
        payload = payload.with_timezone(tz);
    }
    if let Some(offset) = result.meta.gmtoffset {
        payload = payload.with_utc_offset(offset);
    }
    let Some(stamps) = result.timestamp else {
        return Ok(payload);
    };
    if stamps.is_empty() {
        return Ok(payload);
    }

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| FetchCause::Decode("indicators.quote is empty".into()))?;
    let adjclose = result
        .indicators
        .adjclose
        .and_then(|blocks| blocks.into_iter().next())
        .map(|b| b.adjclose);

    payload = payload
        .with_timestamps(stamps.into_iter().map(RawTimestamp::Epoch).collect())
        .with_column("open", quote.open)
        .with_column("high", quote.high)
        .with_column("low", quote.low)
        .with_column("close", quote.close);
    if !quote.volume.is_empty() {
        payload = payload.with_column("volume", quote.volume);
    }
    if let Some(adj) = adjclose {
        payload = payload.with_column("adjclose", adj);
    }
    Ok(payload)
}
