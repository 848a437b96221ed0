use std::time::Duration;

use hinata_types::{AssetClass, CacheConfig, HinataConfig, Period, RetryConfig, Timeframe};

#[test]
fn hinata_config_roundtrip() {
    let mut cfg = HinataConfig::default();
    cfg.default_timeframes.insert(AssetClass::Crypto, Timeframe::H4);
    cfg.default_period = Period::Mo6;
    cfg.coalesce_in_flight = true;

    let json = serde_json::to_string(&cfg).expect("serialize config");
    let de: HinataConfig = serde_json::from_str(&json).expect("deserialize config");

    assert_eq!(de.default_timeframe(AssetClass::Crypto), Timeframe::H4);
    assert_eq!(de.default_timeframe(AssetClass::Equity), Timeframe::D1);
    assert_eq!(de.default_period, Period::Mo6);
    assert!(de.coalesce_in_flight);
    assert_eq!(de.catalog, cfg.catalog);
}

#[test]
fn partial_config_fills_defaults() {
    let de: HinataConfig =
        serde_json::from_str(r#"{ "default_period": "2y", "prefer_adjusted_close": true }"#)
            .expect("deserialize partial config");
    assert_eq!(de.default_period, Period::Y2);
    assert!(de.prefer_adjusted_close);
    assert_eq!(de.catalog.symbols(AssetClass::Forex).len(), 5);
    assert_eq!(de.retry.max_attempts, RetryConfig::default().max_attempts);
}

#[test]
fn timeframe_codes_serialize_as_strings() {
    let json = serde_json::to_string(&[Timeframe::M1, Timeframe::W1, Timeframe::Mo1]).unwrap();
    assert_eq!(json, r#"["1m","1wk","1mo"]"#);
    let tf: Timeframe = serde_json::from_str(r#""60m""#).unwrap();
    assert_eq!(tf, Timeframe::H1);
}

#[test]
fn ttl_scales_with_granularity() {
    let cfg = CacheConfig::default();
    let minute = cfg.ttl_for(Timeframe::M1).unwrap();
    let daily = cfg.ttl_for(Timeframe::D1).unwrap();
    let monthly = cfg.ttl_for(Timeframe::Mo1).unwrap();
    assert!(minute < daily && daily < monthly);
    assert_eq!(daily, Duration::from_secs(3600));
}

#[test]
fn ttl_overrides_and_disable() {
    let cfg = CacheConfig::default()
        .with_ttl(Timeframe::D1, Duration::from_millis(50))
        .with_ttl(Timeframe::M1, Duration::ZERO);
    assert_eq!(cfg.ttl_for(Timeframe::D1), Some(Duration::from_millis(50)));
    assert_eq!(cfg.ttl_for(Timeframe::M1), None, "zero ttl disables caching");

    let off = CacheConfig {
        enabled: false,
        ..CacheConfig::default()
    };
    assert_eq!(off.ttl_for(Timeframe::Mo1), None);
}

#[test]
fn catalog_lookup_is_case_insensitive() {
    let cfg = HinataConfig::default();
    assert_eq!(cfg.catalog.class_of("btc-usd"), Some(AssetClass::Crypto));
    assert_eq!(cfg.catalog.class_of("AAPL"), Some(AssetClass::Equity));
    assert_eq!(cfg.catalog.class_of("NOPE"), None);
}

#[test]
fn cache_config_from_json_uses_overrides_then_table() {
    let cfg: CacheConfig =
        serde_json::from_str(r#"{ "per_timeframe_ttl_ms": { "1h": 1000 } }"#).unwrap();
    assert!(cfg.enabled);
    assert_eq!(cfg.ttl_for(Timeframe::H1), Some(Duration::from_secs(1)));
    for tf in Timeframe::ALL.into_iter().filter(|tf| *tf != Timeframe::H1) {
        assert_eq!(cfg.ttl_for(tf), Some(CacheConfig::builtin_ttl(tf)), "{tf}");
    }

    let json = serde_json::to_value(CacheConfig::default()).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["enabled", "per_timeframe_ttl_ms"]);
}
