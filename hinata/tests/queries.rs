mod helpers;

use std::time::Duration;

use hinata::{AssetClass, HinataConfig, HinataError, Period, Source, Timeframe};
use hinata_mock::MockFetcher;

use crate::helpers::with_mock;

#[tokio::test]
async fn latest_price_is_last_minute_close() {
    let (hinata, _) = with_mock(MockFetcher::new(), HinataConfig::default());

    let price = hinata.latest_price("AAPL", AssetClass::Equity).await.unwrap();
    let report = hinata
        .history(&hinata::SeriesRequest::new(
            "AAPL",
            AssetClass::Equity,
            Timeframe::M1,
            Period::D1,
        ))
        .await
        .unwrap();
    assert_eq!(report.source, Source::Cache);
    assert_eq!(report.series.len(), 390);
    assert_eq!(price, report.series.latest_close());
    assert!(price.is_some());
}

#[tokio::test]
async fn latest_price_of_empty_series_is_none() {
    let (hinata, _) = with_mock(MockFetcher::new(), HinataConfig::default());
    assert_eq!(hinata.latest_price("EMPTY", AssetClass::Equity).await.unwrap(), None);
}

#[tokio::test]
async fn validate_symbol_outcomes() {
    let (hinata, _) = with_mock(MockFetcher::new(), HinataConfig::default());
    assert!(hinata.validate_symbol("AAPL", AssetClass::Equity).await.unwrap());
    assert!(hinata.validate_symbol("BTC-USD", AssetClass::Crypto).await.unwrap());
    assert!(!hinata.validate_symbol("ZZZZINVALID", AssetClass::Equity).await.unwrap());
    assert!(!hinata.validate_symbol("EMPTY", AssetClass::Equity).await.unwrap());

    let err = hinata.validate_symbol("FAIL", AssetClass::Equity).await.unwrap_err();
    assert!(matches!(err, HinataError::Fetch(_)));
    assert!(err.is_actionable());
}

#[tokio::test]
async fn catalog_lookups() {
    let (hinata, _) = with_mock(MockFetcher::new(), HinataConfig::default());

    let catalog = hinata.supported_symbols();
    assert_eq!(catalog.symbols(AssetClass::Equity).len(), 10);
    assert_eq!(catalog.symbols(AssetClass::Crypto).len(), 10);
    assert_eq!(catalog.symbols(AssetClass::Forex).len(), 5);
    assert_eq!(hinata.asset_class_of("eurusd=x"), Some(AssetClass::Forex));
    assert_eq!(hinata.asset_class_of("NOPE"), None);

    let tfs = hinata.supported_timeframes();
    assert_eq!(tfs.first(), Some(&Timeframe::M1));
    assert_eq!(tfs.last(), Some(&Timeframe::Mo1));
    assert!(tfs.contains(&Timeframe::H4));

    assert_eq!(
        hinata.recommended_periods(Timeframe::M5),
        &[Period::D1, Period::D5]
    );
    assert_eq!(hinata.recommended_periods(Timeframe::Mo1)[0], Period::Y1);
}

#[tokio::test(start_paused = true)]
async fn cache_ttl_follows_timeframe() {
    let (hinata, _) = with_mock(MockFetcher::new(), HinataConfig::default());
    let cases = [
        (Timeframe::M5, Duration::from_secs(60)),
        (Timeframe::M30, Duration::from_secs(5 * 60)),
        (Timeframe::H4, Duration::from_secs(15 * 60)),
        (Timeframe::Mo1, Duration::from_secs(6 * 60 * 60)),
    ];
    for (tf, ttl) in cases {
        let req = hinata::SeriesRequest::new("BTC-USD", AssetClass::Crypto, tf, Period::D5);
        let report = hinata.history(&req).await.unwrap();
        let info = hinata.cache().entry_info(&report.key).await.unwrap();
        assert_eq!(info.ttl, ttl, "{tf}");
    }
}
