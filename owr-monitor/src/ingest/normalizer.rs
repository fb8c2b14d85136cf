//! Unit normalization

use super::raw::RawSensorRecord;
use super::IngestError;
use owr_common::db::CanonicalReading;

/// Convert Celsius to Fahrenheit
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// Produce a canonical reading from a raw decoder record
///
/// Fahrenheit is used as-is; Celsius is converted. With neither present the
/// record yields no reading. Humidity is truncated toward zero and otherwise
/// left alone (out-of-range values are the anomaly filter's concern); values
/// past 255 saturate and a missing humidity reads as 0.
pub fn normalize(record: &RawSensorRecord) -> Result<CanonicalReading, IngestError> {
    let temperature_f = match (record.temperature_f, record.temperature_c) {
        (Some(fahrenheit), _) => fahrenheit,
        (None, Some(celsius)) => celsius_to_fahrenheit(celsius),
        (None, None) => {
            return Err(IngestError::MissingTemperature {
                device_model: record.model.clone(),
            })
        }
    };

    Ok(CanonicalReading {
        time: record.time,
        device_model: record.model.clone(),
        temperature_f,
        humidity_pct: record.humidity.unwrap_or(0.0) as u8,
    })
}
