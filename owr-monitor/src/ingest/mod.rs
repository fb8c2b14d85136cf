//! Telemetry ingestion
//!
//! decoder line → [`RawSensorRecord`] → [`normalize`] → [`DeviceRegistry`]
//! → [`AnomalyFilter`] → storage
//!
//! A bad line never stops ingestion. Only loss of the feed itself does.

pub mod feed;
pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod raw;
pub mod registry;

pub use feed::run_feed;
pub use filter::{AnomalyFilter, FilterDecision, FilterThresholds, SuppressReason};
pub use normalizer::normalize;
pub use pipeline::{IngestionPipeline, LineOutcome};
pub use raw::RawSensorRecord;
pub use registry::DeviceRegistry;

use thiserror::Error;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    /// Line is not a decodable sensor record (skip the line)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Record carries neither Fahrenheit nor Celsius (skip the line)
    #[error("No temperature in record from {device_model}")]
    MissingTemperature { device_model: String },

    /// A storage call failed (abort this line, keep reading)
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] owr_common::Error),

    /// Upstream decoder failed to start or its output closed (fatal)
    #[error("Feed terminated: {0}")]
    FeedTerminated(String),
}
