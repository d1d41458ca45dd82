// src/core/validator.rs
//! Cross-checks upstream-reported position metrics against recalculated ones.

use crate::core::calculator::calculate_metrics;
use crate::types::{PositionSnapshot, ValidationOutcome};

// Tolerance bands: a mismatch is an error when |calc - reported| exceeds
// max(floor, |calc| * relative).
const PIPS_FLOOR: f64 = 1.0;
const PIPS_RELATIVE: f64 = 0.02;
const PL_FLOOR: f64 = 0.05;
const PL_RELATIVE: f64 = 0.02;
const PERCENT_FLOOR: f64 = 0.5;
const PERCENT_RELATIVE: f64 = 0.05;

// Sanity limits
const MAX_ABS_PL: f64 = 1_000_000.0;
const MAX_MARGIN: f64 = 1_000_000.0;
const MAX_ABS_PIPS: f64 = 100_000.0;
const MIN_PL_PERCENT: f64 = -90.0;

fn exceeds_tolerance(calculated: f64, reported: f64, floor: f64, relative: f64) -> Option<f64> {
    let diff = (calculated - reported).abs();
    let threshold = floor.max(calculated.abs() * relative);
    (diff > threshold).then_some(diff)
}

/// Compares the reported pips, P&L and P&L% of `position` with the
/// calculator's values and runs the sanity checks.
///
/// Pips are only checked when reported; the percent only when both sides
/// have one. Sanity warnings never affect `is_valid`.
pub fn validate_position(position: &PositionSnapshot) -> ValidationOutcome {
    let calculated = calculate_metrics(position);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Some(reported) = position.pips {
        if let Some(diff) =
            exceeds_tolerance(calculated.pips, reported, PIPS_FLOOR, PIPS_RELATIVE)
        {
            errors.push(format!(
                "Pips mismatch: calculated {:.2}, reported {:.2} (diff {:.2})",
                calculated.pips, reported, diff
            ));
        }
    }

    if let Some(diff) = exceeds_tolerance(
        calculated.unrealized_pl,
        position.unrealized_pl,
        PL_FLOOR,
        PL_RELATIVE,
    ) {
        errors.push(format!(
            "Unrealized P&L mismatch: calculated ${:.2}, reported ${:.2} (diff ${:.2})",
            calculated.unrealized_pl, position.unrealized_pl, diff
        ));
    }

    if let (Some(calc_pct), Some(reported_pct)) =
        (calculated.unrealized_pl_percent, position.unrealized_pl_percent)
    {
        if let Some(diff) =
            exceeds_tolerance(calc_pct, reported_pct, PERCENT_FLOOR, PERCENT_RELATIVE)
        {
            errors.push(format!(
                "P&L percent mismatch: calculated {:.2}%, reported {:.2}% (diff {:.2}%)",
                calc_pct, reported_pct, diff
            ));
        }
    }

    if position.unrealized_pl.abs() > MAX_ABS_PL {
        warnings.push(format!(
            "Unrealized P&L is implausibly large: ${:.2}",
            position.unrealized_pl
        ));
    }
    if position.margin > MAX_MARGIN {
        warnings.push(format!(
            "Margin is implausibly large: ${:.2}",
            position.margin
        ));
    }
    if let Some(pips) = position.pips {
        if pips.abs() > MAX_ABS_PIPS {
            warnings.push(format!("Pip movement is implausibly large: {:.1}", pips));
        }
    }

    ValidationOutcome {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        calculated,
    }
}

/// Coarse risk gate on the reported values, independent of validation.
pub fn is_position_risky(position: &PositionSnapshot) -> bool {
    position.unrealized_pl.abs() > MAX_ABS_PL
        || position.pips.is_some_and(|pips| pips.abs() > MAX_ABS_PIPS)
        || position.margin > MAX_MARGIN
        || position
            .unrealized_pl_percent
            .is_some_and(|pct| pct < MIN_PL_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    fn eur_usd() -> PositionSnapshot {
        PositionSnapshot {
            symbol: "EUR/USD".to_string(),
            side: Side::Buy,
            volume: 1.5,
            open_price: 1.08456,
            current_price: 1.08582,
            margin: 100.0,
            pips: Some(12.6),
            unrealized_pl: 189.0,
            unrealized_pl_percent: Some(189.0),
        }
    }

    #[test]
    fn test_consistent_position_is_valid() {
        let outcome = validate_position(&eur_usd());
        assert!(outcome.is_valid);
        assert!(outcome.errors.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_zeroed_pl_and_percent_are_errors() {
        let mut position = eur_usd();
        position.unrealized_pl = 0.0;
        position.unrealized_pl_percent = Some(0.0);

        let outcome = validate_position(&position);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].starts_with("Unrealized P&L mismatch"));
        assert!(outcome.errors[1].starts_with("P&L percent mismatch"));
    }

    #[test]
    fn test_pips_only_mismatch_invalidates() {
        let mut position = eur_usd();
        position.pips = Some(20.0);

        let outcome = validate_position(&position);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("Pips mismatch"));
    }

    #[test]
    fn test_pips_within_floor_tolerance() {
        let mut position = eur_usd();
        // Threshold is max(1, 12.6 * 0.02) = 1
        position.pips = Some(13.5);
        assert!(validate_position(&position).is_valid);
    }

    #[test]
    fn test_missing_reported_values_skip_checks() {
        let mut position = eur_usd();
        position.pips = None;
        position.unrealized_pl_percent = None;
        assert!(validate_position(&position).is_valid);

        position.unrealized_pl_percent = Some(-500.0);
        position.margin = 0.0;
        // No calculated percent without margin, so no comparison
        assert!(validate_position(&position).is_valid);
    }

    #[test]
    fn test_pl_floor_tolerance() {
        let mut position = eur_usd();
        position.unrealized_pl = 189.0 + 3.7;
        // Threshold is max(0.05, 189 * 0.02) = 3.78
        assert!(validate_position(&position).is_valid);

        position.unrealized_pl = 189.0 + 3.9;
        assert!(!validate_position(&position).is_valid);
    }

    #[test]
    fn test_sanity_warnings_do_not_invalidate() {
        let mut position = eur_usd();
        position.margin = 2_000_000.0;
        position.unrealized_pl_percent = None;

        let outcome = validate_position(&position);
        assert!(outcome.is_valid);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].starts_with("Margin"));
    }

    #[test]
    fn test_all_warnings_in_order() {
        let mut position = eur_usd();
        position.unrealized_pl = -2_000_000.0;
        position.margin = 5_000_000.0;
        position.pips = Some(250_000.0);

        let outcome = validate_position(&position);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.warnings.len(), 3);
        assert!(outcome.warnings[0].starts_with("Unrealized P&L"));
        assert!(outcome.warnings[1].starts_with("Margin"));
        assert!(outcome.warnings[2].starts_with("Pip movement"));
    }

    #[test]
    fn test_is_valid_matches_errors() {
        let mut position = eur_usd();
        position.pips = Some(-100.0);
        position.unrealized_pl = 1.0;

        let outcome = validate_position(&position);
        assert_eq!(outcome.is_valid, outcome.errors.is_empty());
    }

    #[test]
    fn test_nan_does_not_raise_errors() {
        let position = PositionSnapshot {
            symbol: "USD/JPY".to_string(),
            side: Side::Buy,
            volume: 1.0,
            open_price: 0.0,
            current_price: 0.0,
            margin: 100.0,
            pips: Some(0.0),
            unrealized_pl: 0.0,
            unrealized_pl_percent: Some(0.0),
        };

        let outcome = validate_position(&position);
        assert!(outcome.calculated.unrealized_pl.is_nan());
        assert!(outcome.calculated.unrealized_pl_percent.unwrap().is_nan());
        // NaN never exceeds a threshold
        assert!(outcome.is_valid);
    }

    #[test]
    fn test_risky_percent_boundary() {
        let mut position = eur_usd();
        position.unrealized_pl_percent = Some(-91.0);
        assert!(is_position_risky(&position));

        position.unrealized_pl_percent = Some(-89.0);
        assert!(!is_position_risky(&position));

        position.unrealized_pl_percent = Some(-90.0);
        assert!(!is_position_risky(&position));
    }

    #[test]
    fn test_risky_uses_reported_values() {
        let mut position = eur_usd();
        position.pips = Some(-150_000.0);
        assert!(is_position_risky(&position));

        position.pips = None;
        position.unrealized_pl = 1_000_001.0;
        assert!(is_position_risky(&position));

        position.unrealized_pl = 10.0;
        position.margin = 1_000_001.0;
        assert!(is_position_risky(&position));
    }
}
