// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Crypto asset codes recognised by symbol classification.
/// Pip size, pip value and P&L all branch on `SymbolClass::Crypto`, so
/// extending this list changes every formula at once.
pub const CRYPTO_CODES: &[&str] = &["BTC", "ETH", "BNB", "SOL", "XRP", "LTC"];

/// Standard forex lot: 100,000 base-currency units.
pub const LOT_SIZE: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Anything other than a case-insensitive "buy" is treated as a sell.
    pub fn from_direction(direction: &str) -> Self {
        if direction.trim().eq_ignore_ascii_case("buy") {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    /// +1 for buy, -1 for sell.
    pub fn sign(self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }
}

impl From<String> for Side {
    fn from(direction: String) -> Self {
        Side::from_direction(&direction)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Contract convention a symbol trades under.
///
/// `Other` covers quote currencies that are neither USD nor JPY (e.g. `EUR/GBP`).
/// For those the pip value and P&L are reported as `0.0` rather than an error:
/// consumers rely on receiving a number, so the understatement is a known
/// limitation of the calculator, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    Crypto,
    JpyQuote,
    StandardUsd,
    Other,
}

impl SymbolClass {
    /// Total classification by case-insensitive substring match.
    /// Crypto codes take precedence over "JPY".
    pub fn classify(symbol: &str) -> Self {
        let upper = symbol.to_ascii_uppercase();

        if CRYPTO_CODES.iter().any(|code| upper.contains(code)) {
            SymbolClass::Crypto
        } else if upper.contains("JPY") {
            SymbolClass::JpyQuote
        } else if upper.ends_with("/USD") {
            SymbolClass::StandardUsd
        } else {
            SymbolClass::Other
        }
    }
}

/// One position as seen at a single point in time.
///
/// `pips`, `unrealized_pl` and `unrealized_pl_percent` hold the values reported
/// by the upstream system until the corrector replaces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSnapshot {
    pub symbol: String,
    #[serde(rename = "direction")]
    pub side: Side,
    pub volume: f64,
    pub open_price: f64,
    pub current_price: f64,
    /// USD collateral; `0.0` when the upstream sent nothing
    pub margin: f64,
    pub pips: Option<f64>,
    #[serde(rename = "unrealizedPL")]
    pub unrealized_pl: f64,
    #[serde(rename = "unrealizedPLPercent")]
    pub unrealized_pl_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedMetrics {
    pub pips: f64,
    #[serde(rename = "unrealizedPL")]
    pub unrealized_pl: f64,
    #[serde(rename = "pipValueUSD")]
    pub pip_value_usd: f64,
    /// `None` when margin <= 0
    #[serde(rename = "unrealizedPLPercent")]
    pub unrealized_pl_percent: Option<f64>,
}

/// Result of comparing reported metrics with recalculated ones.
///
/// `is_valid` is always `errors.is_empty()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub calculated: CalculatedMetrics,
}
