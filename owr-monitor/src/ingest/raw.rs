//! Decoder output records

use super::IngestError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One line of decoder JSON output
///
/// Only `time` and `model` are required. Device families differ in which of
/// the remaining fields they send; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSensorRecord {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub time: DateTime<Utc>,
    pub model: String,
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub channel: Option<u8>,
    #[serde(default)]
    pub battery_ok: Option<u8>,
    #[serde(rename = "temperature_F", default)]
    pub temperature_f: Option<f64>,
    #[serde(rename = "temperature_C", default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub button: Option<u8>,
    #[serde(default)]
    pub mic: Option<String>,
}

impl RawSensorRecord {
    /// Decode a single feed line
    pub fn parse_line(line: &str) -> Result<Self, IngestError> {
        serde_json::from_str(line.trim()).map_err(|e| IngestError::MalformedInput(e.to_string()))
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    owr_common::time::parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp: {raw}")))
}
