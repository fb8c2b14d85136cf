//! Device catalog persistence

use super::models::{DeviceCatalogEntry, DeviceModelCount};
use crate::Result;
use sqlx::SqlitePool;

/// Insert a catalog entry unless one already exists for the device model
///
/// Returns `true` when a new entry was created. Relies on the UNIQUE
/// constraint, so racing callers never produce duplicates.
pub async fn insert_if_absent(pool: &SqlitePool, entry: &DeviceCatalogEntry) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO device_models (device_model, name)
        VALUES (?, ?)
        ON CONFLICT(device_model) DO NOTHING
        "#,
    )
    .bind(&entry.device_model)
    .bind(&entry.name)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Look up a catalog entry by device model
pub async fn find(pool: &SqlitePool, device_model: &str) -> Result<Option<DeviceCatalogEntry>> {
    let entry = sqlx::query_as::<_, DeviceCatalogEntry>(
        "SELECT device_model, name FROM device_models WHERE device_model = ?",
    )
    .bind(device_model)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// All catalog entries with the number of stored readings for each
pub async fn list_with_counts(pool: &SqlitePool) -> Result<Vec<DeviceModelCount>> {
    let rows = sqlx::query_as::<_, DeviceModelCount>(
        r#"
        SELECT device_models.device_model AS device_model,
               device_models.name AS name,
               COUNT(weather_reports.id) AS report_count
        FROM device_models
        LEFT JOIN weather_reports ON device_models.device_model = weather_reports.device_model
        GROUP BY device_models.device_model, device_models.name
        ORDER BY device_models.device_model
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
