//! Position metric reconciliation.
//!
//! Recomputes pips, unrealized P&L and P&L% for open forex/CFD/crypto
//! positions, compares them with what the upstream API reported, and
//! substitutes the recalculated values when the two disagree.

pub mod config;
pub mod connectors;
pub mod core;
pub mod error;
pub mod report;
pub mod types;
pub mod utils;

pub use crate::core::banner::{assess_banner, BannerAssessment};
pub use crate::core::calculator::{
    calculate_metrics, compute_pip_value_usd, compute_pips, compute_pl_percent,
    compute_unrealized_pl_usd, pip_size,
};
pub use crate::core::corrector::{fix_position_calculations, validate_and_fix_positions};
pub use crate::core::validator::{is_position_risky, validate_position};
pub use crate::error::{ReconcileError, ReconcileResult};
pub use crate::types::{CalculatedMetrics, PositionSnapshot, Side, SymbolClass, ValidationOutcome};
