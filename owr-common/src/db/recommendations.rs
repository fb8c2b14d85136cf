//! Recommendation history persistence

use super::models::{NewRecommendation, Recommendation};
use crate::Result;
use sqlx::SqlitePool;

/// Append a recommendation and return its assigned identity
pub async fn insert_recommendation(pool: &SqlitePool, rec: &NewRecommendation) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO recommendations (
            time, should_run_cooling, target_temperature_f, should_open_window,
            narrative, indoor_temperature_f, outdoor_temperature_f
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(rec.time)
    .bind(rec.should_run_cooling)
    .bind(rec.target_temperature_f)
    .bind(rec.should_open_window)
    .bind(&rec.narrative)
    .bind(rec.indoor_temperature_f)
    .bind(rec.outdoor_temperature_f)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Most recently appended recommendation
pub async fn latest(pool: &SqlitePool) -> Result<Option<Recommendation>> {
    let rec = sqlx::query_as::<_, Recommendation>(
        r#"
        SELECT id, time, should_run_cooling, target_temperature_f, should_open_window,
               narrative, indoor_temperature_f, outdoor_temperature_f
        FROM recommendations
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(rec)
}

/// Up to `limit` recommendations, newest first
pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Recommendation>> {
    let recs = sqlx::query_as::<_, Recommendation>(
        r#"
        SELECT id, time, should_run_cooling, target_temperature_f, should_open_window,
               narrative, indoor_temperature_f, outdoor_temperature_f
        FROM recommendations
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(recs)
}
