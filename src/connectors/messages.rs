// src/connectors/messages.rs
use crate::error::{ReconcileError, ReconcileResult};
use crate::types::{PositionSnapshot, Side};
use serde::Deserialize;

/// Numeric value as it arrives from the position API.
///
/// The backend serialises decimals either as plain JSON numbers, as strings,
/// or wrapped as `{ "$numberDecimal": "12.34" }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireDecimal {
    Number(f64),
    Wrapped {
        #[serde(rename = "$numberDecimal")]
        number_decimal: String,
    },
    Text(String),
}

impl WireDecimal {
    pub fn to_f64(&self, field: &'static str) -> ReconcileResult<f64> {
        match self {
            WireDecimal::Number(value) => Ok(*value),
            WireDecimal::Wrapped { number_decimal } => parse_decimal(field, number_decimal),
            WireDecimal::Text(text) => parse_decimal(field, text),
        }
    }
}

fn parse_decimal(field: &'static str, text: &str) -> ReconcileResult<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ReconcileError::InvalidDecimal {
            field,
            value: text.to_string(),
        })
}

/// Null or absent coerces to zero.
fn coerce(value: &Option<WireDecimal>, field: &'static str) -> ReconcileResult<f64> {
    match value {
        Some(v) => v.to_f64(field),
        None => Ok(0.0),
    }
}

/// Null or absent stays absent.
fn coerce_optional(value: &Option<WireDecimal>, field: &'static str) -> ReconcileResult<Option<f64>> {
    value.as_ref().map(|v| v.to_f64(field)).transpose()
}

/// Position object as served by the REST endpoint and the price socket.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePosition {
    pub symbol: Option<String>,
    #[serde(alias = "side")]
    pub direction: Option<String>,
    pub volume: Option<WireDecimal>,
    pub open_price: Option<WireDecimal>,
    pub current_price: Option<WireDecimal>,
    #[serde(rename = "unrealizedPL")]
    pub unrealized_pl: Option<WireDecimal>,
    pub margin: Option<WireDecimal>,
    pub pips: Option<WireDecimal>,
    #[serde(rename = "unrealizedPLPercent")]
    pub unrealized_pl_percent: Option<WireDecimal>,
}

impl WirePosition {
    /// Symbol for log lines, even when decoding fails.
    pub fn label(&self) -> &str {
        self.symbol.as_deref().unwrap_or("<unknown>")
    }
}

impl TryFrom<&WirePosition> for PositionSnapshot {
    type Error = ReconcileError;

    fn try_from(wire: &WirePosition) -> ReconcileResult<Self> {
        let symbol = wire
            .symbol
            .clone()
            .ok_or(ReconcileError::MissingField("symbol"))?;
        let direction = wire
            .direction
            .as_deref()
            .ok_or(ReconcileError::MissingField("direction"))?;

        let open_price = coerce(&wire.open_price, "openPrice")?;
        let current_price = coerce(&wire.current_price, "currentPrice")?;

        if !open_price.is_finite() {
            return Err(ReconcileError::NonFinitePrice {
                symbol,
                field: "openPrice",
            });
        }
        if !current_price.is_finite() {
            return Err(ReconcileError::NonFinitePrice {
                symbol,
                field: "currentPrice",
            });
        }

        Ok(PositionSnapshot {
            side: Side::from_direction(direction),
            volume: coerce(&wire.volume, "volume")?,
            open_price,
            current_price,
            margin: coerce(&wire.margin, "margin")?,
            pips: coerce_optional(&wire.pips, "pips")?,
            unrealized_pl: coerce(&wire.unrealized_pl, "unrealizedPL")?,
            unrealized_pl_percent: coerce_optional(
                &wire.unrealized_pl_percent,
                "unrealizedPLPercent",
            )?,
            symbol,
        })
    }
}
