// src/core/corrector.rs
//! Replaces inconsistent upstream metrics with recalculated ones before they
//! reach display or reporting layers.

use crate::core::validator::validate_position;
use crate::types::{PositionSnapshot, ValidationOutcome};
use tracing::warn;

/// Validates `position` and returns the (possibly corrected) copy together
/// with the outcome it was corrected from.
///
/// Any error, pips-only included, triggers substitution of `pips`,
/// `unrealized_pl` and `unrealized_pl_percent`. Margin is passed through.
pub fn correct_position(position: &PositionSnapshot) -> (PositionSnapshot, ValidationOutcome) {
    let outcome = validate_position(position);

    if outcome.is_valid {
        return (position.clone(), outcome);
    }

    let calc = &outcome.calculated;
    warn!(
        symbol = %position.symbol,
        side = %position.side,
        reported_pl = position.unrealized_pl,
        calculated_pl = calc.unrealized_pl,
        reported_pips = ?position.pips,
        calculated_pips = calc.pips,
        reasons = %outcome.errors.join("; "),
        "Overriding reported position metrics with calculated values"
    );

    let corrected = PositionSnapshot {
        pips: Some(calc.pips),
        unrealized_pl: calc.unrealized_pl,
        unrealized_pl_percent: calc.unrealized_pl_percent,
        ..position.clone()
    };

    (corrected, outcome)
}

pub fn fix_position_calculations(position: &PositionSnapshot) -> PositionSnapshot {
    correct_position(position).0
}

/// Order-preserving, one position at a time; no position affects another.
pub fn validate_and_fix_positions(positions: &[PositionSnapshot]) -> Vec<PositionSnapshot> {
    positions.iter().map(fix_position_calculations).collect()
}
