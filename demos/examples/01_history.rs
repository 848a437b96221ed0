use hinata::{AssetClass, Hinata, Period, SeriesRequest, Timeframe};
use hinata_demos::common::get_fetcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let hinata = Hinata::builder().with_fetcher(get_fetcher()).build()?;

    let req = SeriesRequest::new("MSFT", AssetClass::Equity, Timeframe::D1, Period::Mo3);
    let report = hinata.history(&req).await?;
    println!(
        "{}: {} candles from {:?} ({} rows dropped)",
        report.key,
        report.series.len(),
        report.source,
        report.warnings.dropped_rows
    );

    println!("\n## Last 5 sessions:");
    println!(
        "{:<12} | {:<10} | {:<10} | {:<10} | {:<10} | {:<12}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    let skip = report.series.len().saturating_sub(5);
    for c in report.series.candles().iter().skip(skip) {
        println!(
            "{:<12} | {:<10.2} | {:<10.2} | {:<10.2} | {:<10.2} | {:<12.0}",
            c.ts.format("%Y-%m-%d"),
            c.open,
            c.high,
            c.low,
            c.close,
            c.volume
        );
    }

    let again = hinata.history(&req).await?;
    println!("\nsecond call served from {:?}", again.source);
    if let Some(info) = hinata.cache().entry_info(&again.key).await {
        println!("cached at {} for {:?}", info.fetched_at, info.ttl);
    }

    if let Some(price) = hinata.latest_price("BTC-USD", AssetClass::Crypto).await? {
        println!("BTC-USD last: {price:.2}");
    }

    Ok(())
}
