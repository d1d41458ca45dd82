// src/core/calculator.rs
//! Pip and P&L arithmetic per contract convention.
//!
//! Everything here is plain IEEE-754 `f64` arithmetic with no rounding, so the
//! tolerance decisions made downstream depend only on the inputs. Non-finite
//! results (e.g. a zero current price on a JPY pair) are returned as-is.

use crate::types::{CalculatedMetrics, PositionSnapshot, Side, SymbolClass, LOT_SIZE};

/// Flat USD value of one pip on one standard lot of a `*/USD` pair.
const USD_QUOTE_PIP_VALUE: f64 = 10.0;

pub fn pip_size(symbol: &str) -> f64 {
    match SymbolClass::classify(symbol) {
        SymbolClass::Crypto => 1.0,
        SymbolClass::JpyQuote => 0.01,
        SymbolClass::StandardUsd | SymbolClass::Other => 0.0001,
    }
}

fn price_diff(side: Side, open_price: f64, current_price: f64) -> f64 {
    match side {
        Side::Buy => current_price - open_price,
        Side::Sell => open_price - current_price,
    }
}

/// Signed pip movement in the position's favour.
pub fn compute_pips(symbol: &str, side: Side, open_price: f64, current_price: f64) -> f64 {
    price_diff(side, open_price, current_price) / pip_size(symbol)
}

/// USD value of a one-pip move for `volume` lots (or coins for crypto).
/// Returns `0.0` for `SymbolClass::Other`.
pub fn compute_pip_value_usd(symbol: &str, volume: f64, current_price: f64) -> f64 {
    match SymbolClass::classify(symbol) {
        SymbolClass::Crypto => pip_size(symbol) * volume,
        SymbolClass::StandardUsd => USD_QUOTE_PIP_VALUE * volume,
        SymbolClass::JpyQuote => (pip_size(symbol) * LOT_SIZE * volume) / current_price,
        SymbolClass::Other => 0.0,
    }
}

/// Mark-to-market P&L in USD. Returns `0.0` for `SymbolClass::Other`.
pub fn compute_unrealized_pl_usd(
    symbol: &str,
    side: Side,
    open_price: f64,
    current_price: f64,
    volume: f64,
) -> f64 {
    let diff = price_diff(side, open_price, current_price);

    match SymbolClass::classify(symbol) {
        SymbolClass::Crypto => diff * volume,
        SymbolClass::StandardUsd => diff * LOT_SIZE * volume,
        SymbolClass::JpyQuote => (diff * LOT_SIZE * volume) / current_price,
        SymbolClass::Other => 0.0,
    }
}

/// P&L as a percentage of margin; undefined (`None`) when margin <= 0.
pub fn compute_pl_percent(pl_usd: f64, margin: f64) -> Option<f64> {
    if margin > 0.0 {
        Some((pl_usd / margin) * 100.0)
    } else {
        None
    }
}

/// Recomputes every metric for a snapshot, ignoring its reported values.
pub fn calculate_metrics(position: &PositionSnapshot) -> CalculatedMetrics {
    let pips = compute_pips(
        &position.symbol,
        position.side,
        position.open_price,
        position.current_price,
    );
    let unrealized_pl = compute_unrealized_pl_usd(
        &position.symbol,
        position.side,
        position.open_price,
        position.current_price,
        position.volume,
    );

    CalculatedMetrics {
        pips,
        unrealized_pl,
        pip_value_usd: compute_pip_value_usd(
            &position.symbol,
            position.volume,
            position.current_price,
        ),
        unrealized_pl_percent: compute_pl_percent(unrealized_pl, position.margin),
    }
}
