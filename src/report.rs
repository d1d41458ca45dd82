// src/report.rs
//! Output records handed to display and reporting layers.

use crate::config::DisplayConfig;
use crate::core::banner::BannerAssessment;
use crate::types::{PositionSnapshot, ValidationOutcome};
use crate::utils::precision::round_for_display;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Rounded values for rendering. `None` stands for "no value" (absent or
/// non-finite).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayValues {
    pub pips: Option<Decimal>,
    #[serde(rename = "unrealizedPL")]
    pub unrealized_pl: Option<Decimal>,
    #[serde(rename = "unrealizedPLPercent")]
    pub unrealized_pl_percent: Option<Decimal>,
}

impl DisplayValues {
    pub fn from_position(position: &PositionSnapshot, display: &DisplayConfig) -> Self {
        Self {
            pips: position
                .pips
                .and_then(|pips| round_for_display(pips, display.pips_dp)),
            unrealized_pl: round_for_display(position.unrealized_pl, display.pl_dp),
            unrealized_pl_percent: position
                .unrealized_pl_percent
                .and_then(|pct| round_for_display(pct, display.percent_dp)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    /// Snapshot after correction
    pub position: PositionSnapshot,
    pub corrected: bool,
    pub risky: bool,
    pub validation: ValidationOutcome,
    pub banner: BannerAssessment,
    pub display: DisplayValues,
}

impl PositionReport {
    pub fn needs_attention(&self) -> bool {
        self.corrected || self.risky || !self.validation.warnings.is_empty()
    }
}

/// A wire position that could not be turned into a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedPosition {
    pub index: usize,
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub batch: u64,
    pub generated_at: DateTime<Utc>,
    pub corrected_count: usize,
    pub risky_count: usize,
    pub positions: Vec<PositionReport>,
    pub rejected: Vec<RejectedPosition>,
}

impl BatchReport {
    /// Drops positions that are valid, unflagged and warning-free.
    /// Counts are left as computed over the full batch.
    pub fn retain_attention_only(&mut self) {
        self.positions.retain(PositionReport::needs_attention);
    }
}
