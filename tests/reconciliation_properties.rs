//! Property-based tests for the reconciliation core.
//!
//! These run the calculator, validator and corrector over random
//! positions and check the invariants that must hold for every input.

use position_reconciler::{
    calculate_metrics, compute_pips, compute_pl_percent, compute_unrealized_pl_usd,
    fix_position_calculations, is_position_risky, pip_size, validate_and_fix_positions,
    validate_position, PositionSnapshot, Side,
};
use position_reconciler::types::CRYPTO_CODES;
use proptest::prelude::*;

fn symbol_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "EUR/USD", "GBP/USD", "usd/jpy", "EUR/JPY", "BTC/USD", "ETH/USDT", "SOL/USD", "bnb/usd",
        "XRP/USD", "LTC/USDT", "BTC/JPY", "EUR/GBP", "AUD/CAD",
    ])
}

fn position_strategy() -> impl Strategy<Value = PositionSnapshot> {
    (
        symbol_strategy(),
        any::<bool>(),
        0.01f64..10.0,
        0.5f64..50_000.0,
        -0.05f64..0.05,
        -100.0f64..1_000.0,
    )
        .prop_map(|(symbol, buy, volume, open_price, drift, margin)| PositionSnapshot {
            symbol: symbol.to_string(),
            side: if buy { Side::Buy } else { Side::Sell },
            volume,
            open_price,
            current_price: open_price * (1.0 + drift),
            margin,
            pips: None,
            unrealized_pl: 0.0,
            unrealized_pl_percent: None,
        })
}

/// Copies the calculated metrics into the reported fields.
fn consistent(mut position: PositionSnapshot) -> PositionSnapshot {
    let calc = calculate_metrics(&position);
    position.pips = Some(calc.pips);
    position.unrealized_pl = calc.unrealized_pl;
    position.unrealized_pl_percent = calc.unrealized_pl_percent;
    position
}

proptest! {
    /// Pip size depends only on the symbol class
    #[test]
    fn pip_size_partitions_symbols(symbol in symbol_strategy()) {
        let upper = symbol.to_uppercase();
        let expected = if CRYPTO_CODES.iter().any(|code| upper.contains(code)) {
            1.0
        } else if upper.contains("JPY") {
            0.01
        } else {
            0.0001
        };
        prop_assert_eq!(pip_size(symbol), expected);
    }

    /// Flipping the side flips the sign of pips and P&L exactly
    #[test]
    fn buy_and_sell_are_mirror_images(
        symbol in symbol_strategy(),
        open in 0.5f64..50_000.0,
        current in 0.5f64..50_000.0,
        volume in 0.01f64..10.0,
    ) {
        prop_assert_eq!(
            compute_pips(symbol, Side::Buy, open, current),
            -compute_pips(symbol, Side::Sell, open, current)
        );
        prop_assert_eq!(
            compute_unrealized_pl_usd(symbol, Side::Buy, open, current, volume),
            -compute_unrealized_pl_usd(symbol, Side::Sell, open, current, volume)
        );
    }

    /// Percent of a non-positive margin is undefined
    #[test]
    fn percent_needs_positive_margin(pl in -1e9f64..1e9, margin in -1e6f64..=0.0) {
        prop_assert_eq!(compute_pl_percent(pl, margin), None);
    }

    /// Same input, same outcome
    #[test]
    fn validation_is_deterministic(position in position_strategy(), reported_pl in -1e4f64..1e4) {
        let mut position = position;
        position.unrealized_pl = reported_pl;

        let first = validate_position(&position);
        let second = validate_position(&position);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.is_valid, first.errors.is_empty());
    }

    /// Already-consistent snapshots come back unchanged
    #[test]
    fn corrector_leaves_consistent_positions_alone(position in position_strategy()) {
        let position = consistent(position);
        prop_assert!(validate_position(&position).is_valid);
        prop_assert_eq!(fix_position_calculations(&position), position);
    }

    /// After correction the snapshot always validates
    #[test]
    fn corrected_positions_validate(
        position in position_strategy(),
        reported_pl in -1e4f64..1e4,
        reported_pips in -1e4f64..1e4,
    ) {
        let mut position = position;
        position.unrealized_pl = reported_pl;
        position.pips = Some(reported_pips);
        position.unrealized_pl_percent = Some(0.0);

        let fixed = fix_position_calculations(&position);
        prop_assert!(validate_position(&fixed).is_valid);
        prop_assert_eq!(fixed.margin, position.margin);
    }

    /// Batch correction is the element-wise correction, in order
    #[test]
    fn batch_is_elementwise(positions in prop::collection::vec(position_strategy(), 0..20)) {
        let fixed = validate_and_fix_positions(&positions);
        prop_assert_eq!(fixed.len(), positions.len());
        for (original, corrected) in positions.iter().zip(&fixed) {
            prop_assert_eq!(&fix_position_calculations(original), corrected);
        }
    }
}

#[test]
fn every_crypto_code_uses_unit_pips() {
    for code in CRYPTO_CODES {
        assert_eq!(pip_size(&format!("{}/USD", code)), 1.0, "{}", code);
        assert_eq!(pip_size(&format!("{}/jpy", code.to_lowercase())), 1.0, "{}", code);
    }
}

#[test]
fn zeroed_upstream_metrics_are_replaced() {
    let position = PositionSnapshot {
        symbol: "EUR/USD".to_string(),
        side: Side::Buy,
        volume: 1.5,
        open_price: 1.08456,
        current_price: 1.08582,
        margin: 100.0,
        pips: None,
        unrealized_pl: 0.0,
        unrealized_pl_percent: Some(0.0),
    };

    let outcome = validate_position(&position);
    assert!(!outcome.is_valid);

    let fixed = fix_position_calculations(&position);
    assert!((fixed.unrealized_pl - 189.0).abs() < 1e-6);
    assert!((fixed.unrealized_pl_percent.unwrap() - 189.0).abs() < 1e-6);
}

#[test]
fn risk_flag_percent_boundary() {
    let mut position = PositionSnapshot {
        symbol: "GBP/USD".to_string(),
        side: Side::Sell,
        volume: 1.0,
        open_price: 1.25,
        current_price: 1.26,
        margin: 1_000.0,
        pips: Some(-100.0),
        unrealized_pl: -1_000.0,
        unrealized_pl_percent: Some(-91.0),
    };
    assert!(is_position_risky(&position));

    position.unrealized_pl_percent = Some(-89.0);
    assert!(!is_position_risky(&position));
}
