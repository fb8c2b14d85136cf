//! Database models
//!
//! Serialized field names follow the JSON contract of the bundled web UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized sensor observation, not yet persisted
///
/// Temperature is always Fahrenheit, whatever unit the sensor reported.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalReading {
    pub time: DateTime<Utc>,
    pub device_model: String,
    pub temperature_f: f64,
    pub humidity_pct: u8,
}

/// A persisted reading with its storage-assigned identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredReading {
    #[serde(rename = "DbId")]
    pub id: i64,
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
    #[serde(rename = "DeviceModel")]
    pub device_model: String,
    #[serde(rename = "TemperatureInF")]
    pub temperature_f: f64,
    #[serde(rename = "HumidityInPercentage")]
    pub humidity_pct: u8,
}

impl StoredReading {
    /// Drop the identity, yielding the reading as it was before persistence
    pub fn to_canonical(&self) -> CanonicalReading {
        CanonicalReading {
            time: self.time,
            device_model: self.device_model.clone(),
            temperature_f: self.temperature_f,
            humidity_pct: self.humidity_pct,
        }
    }
}

/// Catalog entry for a device model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeviceCatalogEntry {
    #[serde(rename = "DeviceModel")]
    pub device_model: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Catalog entry with the number of readings stored for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeviceModelCount {
    #[serde(rename = "DeviceModel")]
    pub device_model: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ReportCount")]
    pub report_count: i64,
}

/// A recommendation ready to be appended to history
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecommendation {
    pub time: DateTime<Utc>,
    pub should_run_cooling: bool,
    pub target_temperature_f: i64,
    pub should_open_window: bool,
    pub narrative: String,
    pub indoor_temperature_f: f64,
    pub outdoor_temperature_f: f64,
}

impl NewRecommendation {
    /// Attach the identity assigned by storage
    pub fn into_recommendation(self, id: i64) -> Recommendation {
        Recommendation {
            id,
            time: self.time,
            should_run_cooling: self.should_run_cooling,
            target_temperature_f: self.target_temperature_f,
            should_open_window: self.should_open_window,
            narrative: self.narrative,
            indoor_temperature_f: self.indoor_temperature_f,
            outdoor_temperature_f: self.outdoor_temperature_f,
        }
    }
}

/// A persisted recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recommendation {
    #[serde(rename = "DbId")]
    pub id: i64,
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
    #[serde(rename = "ShouldOperateAirConditioner")]
    pub should_run_cooling: bool,
    #[serde(rename = "TemperatureToSetAirConditionerInF")]
    pub target_temperature_f: i64,
    #[serde(rename = "ShouldWindowBeOpen")]
    pub should_open_window: bool,
    #[serde(rename = "WeatherDescription")]
    pub narrative: String,
    #[serde(rename = "IndoorTemperatureF")]
    pub indoor_temperature_f: f64,
    #[serde(rename = "OutdoorTemperatureF")]
    pub outdoor_temperature_f: f64,
}
