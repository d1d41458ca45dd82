// src/connectors/traits.rs
use crate::connectors::messages::WirePosition;
use crate::error::ReconcileResult;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Upstream source of position batches (REST poller, socket, file replay).
#[async_trait]
pub trait PositionFeed: Send {
    fn name(&self) -> String;

    /// Pushes batches into `sender` until the source is exhausted.
    /// Returns the number of batches delivered.
    async fn stream_batches(
        &mut self,
        sender: mpsc::Sender<Vec<WirePosition>>,
    ) -> ReconcileResult<u64>;
}
