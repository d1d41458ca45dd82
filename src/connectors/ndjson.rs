// src/connectors/ndjson.rs
use crate::connectors::messages::WirePosition;
use crate::connectors::traits::PositionFeed;
use crate::error::{ReconcileError, ReconcileResult};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// A line is either a full batch or a single position.
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchLine {
    Many(Vec<WirePosition>),
    One(WirePosition),
}

/// Replays newline-delimited JSON batches from any async reader.
pub struct NdjsonFeed<R> {
    reader: R,
    source: String,
}

impl<R> NdjsonFeed<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R, source: impl Into<String>) -> Self {
        Self {
            reader,
            source: source.into(),
        }
    }
}

#[async_trait]
impl<R> PositionFeed for NdjsonFeed<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn name(&self) -> String {
        format!("ndjson:{}", self.source)
    }

    async fn stream_batches(
        &mut self,
        sender: mpsc::Sender<Vec<WirePosition>>,
    ) -> ReconcileResult<u64> {
        let mut lines = (&mut self.reader).lines();
        let mut line_no = 0u64;
        let mut delivered = 0u64;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let batch = match serde_json::from_str::<BatchLine>(line) {
                Ok(BatchLine::Many(batch)) => batch,
                Ok(BatchLine::One(position)) => vec![position],
                Err(e) => {
                    // A bad line is skipped; the stream goes on
                    error!(source = %self.source, line = line_no, "Malformed batch: {}", e);
                    continue;
                }
            };

            debug!(line = line_no, size = batch.len(), "Batch read");
            sender
                .send(batch)
                .await
                .map_err(|_| ReconcileError::ChannelClosed)?;
            delivered += 1;
        }

        info!(source = %self.source, batches = delivered, "Feed exhausted");
        Ok(delivered)
    }
}
