use hinata::{AssetClass, Hinata, Period, SeriesRequest, Timeframe};
use hinata_demos::common::{get_fetcher, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,hinata=debug,hinata_yahoo=debug,hinata_middleware=debug
    init_tracing();

    let hinata = Hinata::builder().with_fetcher(get_fetcher()).build()?;

    // Clamped from 1y to 5d for minute bars; logged as a warning.
    let req = SeriesRequest::new("AAPL", AssetClass::Equity, Timeframe::M5, Period::Y1);
    let _ = hinata.history(&req).await?;

    // Second call is a cache hit.
    let _ = hinata.history(&req).await?;

    // Unknown symbol surfaces as an error event.
    let _ = hinata.validate_symbol("ZZZZINVALID", AssetClass::Equity).await?;

    Ok(())
}
