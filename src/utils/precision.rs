// src/utils/precision.rs
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a calculated value for display only, half away from zero.
/// Returns `None` for NaN/infinity so callers can render a placeholder.
/// Example: 12.649999, dp=1 -> 12.6; -40.90885, dp=2 -> -40.91
pub fn round_for_display(value: f64, dp: u32) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}
