// src/core/engine.rs
use crate::config::DisplayConfig;
use crate::connectors::messages::WirePosition;
use crate::core::banner::assess_banner;
use crate::core::corrector::correct_position;
use crate::core::validator::is_position_risky;
use crate::error::ReconcileResult;
use crate::report::{BatchReport, DisplayValues, PositionReport, RejectedPosition};
use crate::types::PositionSnapshot;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Background reconciliation job: decodes incoming batches, corrects every
/// position independently and emits one report per batch.
pub struct ReconcileEngine {
    display: DisplayConfig,
    batch_receiver: mpsc::Receiver<Vec<WirePosition>>,
    report_sender: mpsc::Sender<BatchReport>,
    batches_seen: u64,
}

impl ReconcileEngine {
    pub fn new(
        display: DisplayConfig,
        batch_receiver: mpsc::Receiver<Vec<WirePosition>>,
        report_sender: mpsc::Sender<BatchReport>,
    ) -> Self {
        Self {
            display,
            batch_receiver,
            report_sender,
            batches_seen: 0,
        }
    }

    /// Runs until the batch channel closes or the report consumer goes away.
    /// Returns the number of batches processed.
    pub async fn run(&mut self) -> ReconcileResult<u64> {
        info!("Reconciliation engine started");

        while let Some(batch) = self.batch_receiver.recv().await {
            self.batches_seen += 1;
            let report = reconcile_batch(self.batches_seen, &batch, &self.display);

            info!(
                batch = report.batch,
                positions = report.positions.len(),
                corrected = report.corrected_count,
                risky = report.risky_count,
                rejected = report.rejected.len(),
                "Batch reconciled"
            );

            if self.report_sender.send(report).await.is_err() {
                // Consumer stopped reading (shutdown); not a failure
                info!(batches = self.batches_seen, "Report consumer gone, engine stopping");
                return Ok(self.batches_seen);
            }
        }

        info!(batches = self.batches_seen, "Batch feed closed, engine stopping");
        Ok(self.batches_seen)
    }
}

/// Reconciles one batch. Positions that fail to decode are listed in
/// `rejected` and do not affect the others.
pub fn reconcile_batch(batch_no: u64, batch: &[WirePosition], display: &DisplayConfig) -> BatchReport {
    let mut positions = Vec::with_capacity(batch.len());
    let mut rejected = Vec::new();

    for (index, wire) in batch.iter().enumerate() {
        let snapshot = match PositionSnapshot::try_from(wire) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(batch = batch_no, index, symbol = %wire.label(), "Rejected position: {}", e);
                rejected.push(RejectedPosition {
                    index,
                    symbol: wire.label().to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let risky = is_position_risky(&snapshot);
        let banner = assess_banner(&snapshot);
        let (position, validation) = correct_position(&snapshot);

        if risky {
            warn!(symbol = %snapshot.symbol, "Position flagged as risky");
        }

        positions.push(PositionReport {
            display: DisplayValues::from_position(&position, display),
            corrected: !validation.is_valid,
            risky,
            validation,
            banner,
            position,
        });
    }

    BatchReport {
        batch: batch_no,
        generated_at: Utc::now(),
        corrected_count: positions.iter().filter(|p| p.corrected).count(),
        risky_count: positions.iter().filter(|p| p.risky).count(),
        positions,
        rejected,
    }
}
