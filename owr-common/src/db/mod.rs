//! Database models and queries
//!
//! SQLite is the storage collaborator shared by ingestion, the
//! recommendation scheduler and the HTTP query surface. Every function here
//! is an independent call; none groups work into a transaction.

pub mod devices;
pub mod models;
pub mod readings;
pub mod recommendations;

pub use models::*;

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Open (creating if needed) the database file and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // WAL lets the HTTP readers proceed while ingestion writes
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with the full schema
///
/// An in-memory SQLite database lives per connection, so the pool is capped
/// at one connection to keep every query on the same data.
pub async fn init_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weather_reports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            time TEXT NOT NULL,
            device_model TEXT NOT NULL,
            temperature_f REAL NOT NULL,
            humidity_pct INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_weather_reports_time ON weather_reports(time)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_weather_reports_device_model ON weather_reports(device_model)",
    )
    .execute(pool)
    .await?;

    // UNIQUE(device_model) makes concurrent registration of the same device safe
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS device_models (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            device_model TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recommendations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            time TEXT NOT NULL,
            should_run_cooling INTEGER NOT NULL,
            target_temperature_f INTEGER NOT NULL,
            should_open_window INTEGER NOT NULL,
            narrative TEXT NOT NULL,
            indoor_temperature_f REAL NOT NULL,
            outdoor_temperature_f REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_recommendations_time ON recommendations(time)")
        .execute(pool)
        .await?;

    tracing::debug!("Database schema ready (weather_reports, device_models, recommendations)");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_schema_is_idempotent() {
        let pool = init_in_memory().await.unwrap();

        create_schema(&pool).await.expect("Second schema creation should succeed");

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(names, vec!["device_models", "recommendations", "weather_reports"]);
    }

    #[tokio::test]
    async fn test_init_database_creates_file_and_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("weather.db");

        let pool = init_database(&db_path).await.unwrap();
        pool.close().await;

        assert!(db_path.exists());
    }
}
