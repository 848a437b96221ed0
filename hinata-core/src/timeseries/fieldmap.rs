//! Per-asset-class mapping from provider columns to the canonical schema.

use chrono_tz::Tz;

use crate::types::AssetClass;

/// How the volume column is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeField {
    /// Rows without a volume value are dropped.
    Required(&'static str),
    /// Missing column or missing values become zero volume.
    Optional(&'static str),
}

impl VolumeField {
    /// Provider column name.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Required(c) | Self::Optional(c) => c,
        }
    }
}

/// Column layout and session conventions of one asset class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    /// Open price column.
    pub open: &'static str,
    /// High price column.
    pub high: &'static str,
    /// Low price column.
    pub low: &'static str,
    /// Close price column.
    pub close: &'static str,
    /// Split/dividend adjusted close column, when the class has one.
    pub adjusted_close: Option<&'static str>,
    /// Volume column and its rule.
    pub volume: VolumeField,
    /// Session timezone assumed when the payload reports none.
    pub session_tz: Tz,
}

const EQUITY: FieldMap = FieldMap {
    open: "open",
    high: "high",
    low: "low",
    close: "close",
    adjusted_close: Some("adjclose"),
    volume: VolumeField::Required("volume"),
    session_tz: chrono_tz::America::New_York,
};

// Exchanges report 24/7 crypto sessions in UTC.
const CRYPTO: FieldMap = FieldMap {
    open: "open",
    high: "high",
    low: "low",
    close: "close",
    adjusted_close: None,
    volume: VolumeField::Required("volume"),
    session_tz: chrono_tz::UTC,
};

// Spot FX has no consolidated volume; providers send zeros or nothing.
const FOREX: FieldMap = FieldMap {
    open: "open",
    high: "high",
    low: "low",
    close: "close",
    adjusted_close: None,
    volume: VolumeField::Optional("volume"),
    session_tz: chrono_tz::Europe::London,
};

/// Field map for `class`.
#[must_use]
pub const fn field_map(class: AssetClass) -> &'static FieldMap {
    match class {
        AssetClass::Equity => &EQUITY,
        AssetClass::Crypto => &CRYPTO,
        AssetClass::Forex => &FOREX,
    }
}
