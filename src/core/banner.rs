// src/core/banner.rs
//! Display-side consistency check for the position detail banner.
//!
//! Independent from `validator`: it uses its own, looser thresholds and only
//! switches the display to calculated values when P&L *and* P&L% disagree.

use crate::core::calculator::calculate_metrics;
use crate::types::{CalculatedMetrics, PositionSnapshot};
use serde::Serialize;

const PL_FLOOR: f64 = 0.05;
const PL_RELATIVE: f64 = 0.03;
const PERCENT_FLOOR: f64 = 0.2;
const PERCENT_RELATIVE: f64 = 0.03;

/// Values the banner should render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMetrics {
    pub pips: Option<f64>,
    #[serde(rename = "unrealizedPL")]
    pub unrealized_pl: f64,
    #[serde(rename = "unrealizedPLPercent")]
    pub unrealized_pl_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerAssessment {
    pub pl_mismatch: bool,
    pub percent_mismatch: bool,
    pub show_warning: bool,
    pub display: DisplayMetrics,
    pub calculated: CalculatedMetrics,
}

fn mismatch(calculated: f64, reported: f64, floor: f64, relative: f64) -> bool {
    (calculated - reported).abs() > floor.max(calculated.abs() * relative)
}

pub fn assess_banner(position: &PositionSnapshot) -> BannerAssessment {
    let calculated = calculate_metrics(position);

    let pl_mismatch = mismatch(
        calculated.unrealized_pl,
        position.unrealized_pl,
        PL_FLOOR,
        PL_RELATIVE,
    );
    let percent_mismatch = match (calculated.unrealized_pl_percent, position.unrealized_pl_percent) {
        (Some(calc), Some(reported)) => mismatch(calc, reported, PERCENT_FLOOR, PERCENT_RELATIVE),
        _ => false,
    };
    let show_warning = pl_mismatch && percent_mismatch;

    let display = if show_warning {
        DisplayMetrics {
            pips: Some(calculated.pips),
            unrealized_pl: calculated.unrealized_pl,
            unrealized_pl_percent: calculated.unrealized_pl_percent,
        }
    } else {
        DisplayMetrics {
            pips: position.pips,
            unrealized_pl: position.unrealized_pl,
            unrealized_pl_percent: position.unrealized_pl_percent,
        }
    };

    BannerAssessment {
        pl_mismatch,
        percent_mismatch,
        show_warning,
        display,
        calculated,
    }
}
