//! Weather reading persistence

use super::models::{CanonicalReading, StoredReading};
use crate::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Append a reading and return its assigned identity
pub async fn insert_reading(pool: &SqlitePool, reading: &CanonicalReading) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO weather_reports (time, device_model, temperature_f, humidity_pct)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(reading.time)
    .bind(&reading.device_model)
    .bind(reading.temperature_f)
    .bind(reading.humidity_pct)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Most recently persisted reading for a device (by identity, not timestamp)
pub async fn latest_for_device(
    pool: &SqlitePool,
    device_model: &str,
) -> Result<Option<StoredReading>> {
    let reading = sqlx::query_as::<_, StoredReading>(
        r#"
        SELECT id, time, device_model, temperature_f, humidity_pct
        FROM weather_reports
        WHERE device_model = ?
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(device_model)
    .fetch_optional(pool)
    .await?;

    Ok(reading)
}

/// Any reading for a device carrying exactly this timestamp
pub async fn find_at(
    pool: &SqlitePool,
    device_model: &str,
    time: DateTime<Utc>,
) -> Result<Option<StoredReading>> {
    let reading = sqlx::query_as::<_, StoredReading>(
        r#"
        SELECT id, time, device_model, temperature_f, humidity_pct
        FROM weather_reports
        WHERE time = ? AND device_model = ?
        LIMIT 1
        "#,
    )
    .bind(time)
    .bind(device_model)
    .fetch_optional(pool)
    .await?;

    Ok(reading)
}

/// Most recently persisted reading across all devices
pub async fn latest(pool: &SqlitePool) -> Result<Option<StoredReading>> {
    let reading = sqlx::query_as::<_, StoredReading>(
        r#"
        SELECT id, time, device_model, temperature_f, humidity_pct
        FROM weather_reports
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(reading)
}

/// Readings for a device newer than `since`, oldest first
pub async fn for_device_since(
    pool: &SqlitePool,
    device_model: &str,
    since: DateTime<Utc>,
) -> Result<Vec<StoredReading>> {
    let readings = sqlx::query_as::<_, StoredReading>(
        r#"
        SELECT id, time, device_model, temperature_f, humidity_pct
        FROM weather_reports
        WHERE device_model = ? AND time > ?
        ORDER BY id ASC
        "#,
    )
    .bind(device_model)
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(readings)
}
