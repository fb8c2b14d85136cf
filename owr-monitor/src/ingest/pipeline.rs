//! Per-line ingestion

use super::{
    normalize, AnomalyFilter, DeviceRegistry, FilterDecision, IngestError, RawSensorRecord,
    SuppressReason,
};
use owr_common::db::readings;
use sqlx::SqlitePool;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, trace, warn};

/// What happened to a single feed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Reading persisted under this id
    Stored { id: i64 },
    /// Reading dropped by the anomaly filter
    Suppressed(SuppressReason),
}

/// Turns decoder lines into stored readings
#[derive(Clone)]
pub struct IngestionPipeline {
    db: SqlitePool,
    registry: DeviceRegistry,
    filter: AnomalyFilter,
}

impl IngestionPipeline {
    pub fn new(db: SqlitePool) -> Self {
        Self::with_filter(db, AnomalyFilter::default())
    }

    pub fn with_filter(db: SqlitePool, filter: AnomalyFilter) -> Self {
        Self {
            registry: DeviceRegistry::new(db.clone()),
            db,
            filter,
        }
    }

    /// Process one decoder line: parse, normalize, register, filter, store
    pub async fn process_line(&self, line: &str) -> Result<LineOutcome, IngestError> {
        let record = RawSensorRecord::parse_line(line)?;
        let candidate = normalize(&record)?;

        self.registry.ensure_registered(&candidate.device_model).await?;

        let prior = readings::latest_for_device(&self.db, &candidate.device_model).await?;
        let same_timestamp =
            readings::find_at(&self.db, &candidate.device_model, candidate.time).await?;

        match self
            .filter
            .evaluate(candidate, prior.as_ref(), same_timestamp.as_ref())
        {
            FilterDecision::Admit(reading) => {
                let id = readings::insert_reading(&self.db, &reading).await?;
                debug!(
                    id,
                    device_model = %reading.device_model,
                    temperature_f = reading.temperature_f,
                    humidity = reading.humidity_pct,
                    "Stored reading"
                );
                Ok(LineOutcome::Stored { id })
            }
            FilterDecision::Suppress(reason) => Ok(LineOutcome::Suppressed(reason)),
        }
    }

    /// Consume lines until the reader ends
    ///
    /// Per-line failures, including lines that are not UTF-8, are logged and
    /// skipped. Always returns [`IngestError::FeedTerminated`], since a live
    /// feed never ends on its own.
    pub async fn run<R>(&self, reader: R) -> IngestError
    where
        R: AsyncBufRead + Unpin,
    {
        let mut segments = reader.split(b'\n');
        let mut stored: u64 = 0;

        loop {
            let bytes = match segments.next_segment().await {
                Ok(Some(bytes)) => bytes,
                Ok(None) => {
                    info!(stored, "Feed output closed");
                    return IngestError::FeedTerminated("feed output closed".to_string());
                }
                Err(e) => {
                    return IngestError::FeedTerminated(format!("read from feed failed: {}", e));
                }
            };

            let line = match std::str::from_utf8(&bytes) {
                Ok(line) => line.trim(),
                Err(e) => {
                    let err = IngestError::MalformedInput(format!("line is not UTF-8: {}", e));
                    warn!("Skipping feed line: {}", err);
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }
            trace!(line, "Feed line");

            match self.process_line(line).await {
                Ok(LineOutcome::Stored { .. }) => stored += 1,
                Ok(LineOutcome::Suppressed(reason)) => {
                    debug!(%reason, "Reading suppressed");
                }
                Err(IngestError::MissingTemperature { device_model }) => {
                    debug!(device_model = %device_model, "Skipping record without temperature");
                }
                Err(e) => warn!("Skipping feed line: {}", e),
            }
        }
    }
}
