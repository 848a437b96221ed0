use hinata::{AssetClass, Hinata, Period, SeriesRequest, Timeframe};
use hinata_demos::common::get_fetcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let hinata = Hinata::builder().with_fetcher(get_fetcher()).build()?;

    // Providers serve hourly bars; 4h bars are aggregated locally.
    let req = SeriesRequest::new("ETH-USD", AssetClass::Crypto, Timeframe::H4, Period::D5);
    let report = hinata.history(&req).await?;

    println!("Fetched {} four-hour candles for {}", report.series.len(), req.symbol);
    println!(
        "{:<17} | {:<10} | {:<10} | {:<10} | {:<10}",
        "Bucket", "Open", "High", "Low", "Close"
    );
    for c in report.series.candles().iter().take(12) {
        println!(
            "{:<17} | {:<10.2} | {:<10.2} | {:<10.2} | {:<10.2}",
            c.ts.format("%Y-%m-%d %H:%M"),
            c.open,
            c.high,
            c.low,
            c.close
        );
    }

    println!("\nRecommended periods for {}:", Timeframe::H4);
    for p in hinata.recommended_periods(Timeframe::H4) {
        println!("  {p}");
    }

    Ok(())
}
