// src/main.rs
//! Streams position batches (NDJSON, one batch per line) from a file or stdin
//! through the reconciliation engine and prints one JSON report per batch.
//!
//! ```bash
//! position_reconciler positions.ndjson
//! APP_EMIT_VALID=false position_reconciler < positions.ndjson
//! ```

use anyhow::Context;
use dotenvy::dotenv;
use position_reconciler::config::AppConfig;
use position_reconciler::connectors::messages::WirePosition;
use position_reconciler::connectors::ndjson::NdjsonFeed;
use position_reconciler::connectors::traits::PositionFeed;
use position_reconciler::core::engine::ReconcileEngine;
use tokio::io::{AsyncBufRead, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging(config: &AppConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    // stdout carries reports, so console logs go to stderr
    let console = fmt::layer().with_writer(std::io::stderr);

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "reconciler.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(filter).with(console).init();
            Ok(None)
        }
    }
}

async fn run_feed<R>(mut feed: NdjsonFeed<R>, sender: mpsc::Sender<Vec<WirePosition>>)
where
    R: AsyncBufRead + Unpin + Send,
{
    info!(feed = %feed.name(), "Feed started");
    if let Err(e) = feed.stream_batches(sender).await {
        error!("Feed stopped: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 1. Configuration & logging
    let config = AppConfig::new().context("Failed to load configuration")?;
    let log_guard = init_logging(&config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        emit_valid = config.emit_valid,
        "Position reconciler"
    );

    // 2. Channels
    let (batch_tx, batch_rx) = mpsc::channel(config.channel_capacity);
    let (report_tx, mut report_rx) = mpsc::channel(config.channel_capacity);

    // 3. Feed: file argument or stdin
    let feed_task = match std::env::args().nth(1) {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Cannot open {}", path))?;
            tokio::spawn(run_feed(NdjsonFeed::new(BufReader::new(file), path), batch_tx))
        }
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            tokio::spawn(run_feed(NdjsonFeed::new(stdin, "stdin"), batch_tx))
        }
    };

    // 4. Engine
    let mut engine = ReconcileEngine::new(config.display.clone(), batch_rx, report_tx);
    let engine_task = tokio::spawn(async move { engine.run().await });

    // 5. Print reports until the engine finishes or Ctrl+C
    let mut stdout = tokio::io::stdout();
    let mut interrupted = false;
    loop {
        tokio::select! {
            report = report_rx.recv() => {
                let Some(mut report) = report else { break };
                if !config.emit_valid {
                    report.retain_attention_only();
                }
                let mut line = serde_json::to_vec(&report)?;
                line.push(b'\n');
                stdout.write_all(&line).await?;
                stdout.flush().await?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                interrupted = true;
                break;
            }
        }
    }

    if interrupted {
        feed_task.abort();
        engine_task.abort();
        stdout.flush().await?;
        drop(log_guard);
        // A pending stdin read holds a blocking thread that runtime shutdown
        // would wait on until the next newline
        std::process::exit(0);
    }

    match engine_task.await {
        Ok(Ok(batches)) => info!(batches, "Done"),
        Ok(Err(e)) => error!("Engine stopped: {}", e),
        Err(e) => error!("Engine task failed: {}", e),
    }

    Ok(())
}
