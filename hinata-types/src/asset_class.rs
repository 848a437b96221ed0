use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Category of tradable instrument with its own provider conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    /// Listed stocks and ETFs.
    Equity,
    /// Crypto pairs quoted against a fiat currency.
    Crypto,
    /// Spot foreign exchange pairs.
    Forex,
}

impl AssetClass {
    /// All asset classes, in catalog order.
    pub const ALL: [Self; 3] = [Self::Equity, Self::Crypto, Self::Forex];

    /// Stable lowercase identifier for logs and keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equity => "equity",
            Self::Crypto => "crypto",
            Self::Forex => "forex",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equity" | "stock" | "stocks" => Ok(Self::Equity),
            "crypto" => Ok(Self::Crypto),
            "forex" | "fx" => Ok(Self::Forex),
            _ => Err(ParseError::AssetClass(s.to_string())),
        }
    }
}
