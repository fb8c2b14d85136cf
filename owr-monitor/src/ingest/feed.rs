//! Decoder process feed

use super::{IngestError, IngestionPipeline};
use owr_common::config::FeedConfig;
use std::process::Stdio;
use tokio::io::BufReader;
use tokio::process::Command;
use tracing::{error, info};

/// Spawn the decoder and ingest its stdout until it stops
///
/// Returns only on failure: the decoder could not be started, or its output
/// closed. Either way the caller should treat ingestion as dead.
pub async fn run_feed(config: &FeedConfig, pipeline: &IngestionPipeline) -> IngestError {
    info!(
        command = %config.command.display(),
        args = ?config.args,
        "Starting decoder feed"
    );

    let mut child = match Command::new(&config.command)
        .args(&config.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            error!("Failed to start {}: {}", config.command.display(), e);
            return IngestError::FeedTerminated(format!(
                "failed to start {}: {}",
                config.command.display(),
                e
            ));
        }
    };

    let Some(stdout) = child.stdout.take() else {
        return IngestError::FeedTerminated("decoder stdout not captured".to_string());
    };

    let err = pipeline.run(BufReader::new(stdout)).await;

    match child.try_wait() {
        Ok(Some(status)) => info!(%status, "Decoder exited"),
        Ok(None) => info!("Decoder closed its output while still running"),
        Err(e) => error!("Failed to query decoder status: {}", e),
    }

    err
}
