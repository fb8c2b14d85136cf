//! End-to-end ingestion over an in-memory feed

use owr_common::db::{devices, init_in_memory, readings, DeviceCatalogEntry};
use owr_monitor::ingest::{IngestError, IngestionPipeline};

#[tokio::test]
async fn test_three_line_feed_stores_two_readings() {
    let db = init_in_memory().await.unwrap();

    devices::insert_if_absent(
        &db,
        &DeviceCatalogEntry {
            device_model: "LaCrosse-TX141W".to_string(),
            name: "Back porch".to_string(),
        },
    )
    .await
    .unwrap();

    let feed = concat!(
        r#"{"time":"2024-06-01T12:00:00Z","model":"LaCrosse-TX141W","id":101,"channel":0,"battery_ok":1,"temperature_F":81.3,"humidity":40,"mic":"CRC"}"#,
        "\n",
        r#"{"time":"2024-06-01T12:00:05Z","model":"#,
        "\n",
        r#"{"time":"2024-06-01 12:00:10","model":"Acurite-609TXC","id":44,"battery_ok":1,"temperature_C":22.5,"humidity":51}"#,
        "\n",
    );

    let pipeline = IngestionPipeline::new(db.clone());
    let err = pipeline.run(feed.as_bytes()).await;
    assert!(matches!(err, IngestError::FeedTerminated(_)));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weather_reports")
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(count, 2);

    let catalog = devices::list_with_counts(&db).await.unwrap();
    assert_eq!(catalog.len(), 2);

    // Pre-existing display name is left alone
    let porch = catalog.iter().find(|d| d.device_model == "LaCrosse-TX141W").unwrap();
    assert_eq!(porch.name, "Back porch");
    assert_eq!(porch.report_count, 1);

    let acurite = catalog.iter().find(|d| d.device_model == "Acurite-609TXC").unwrap();
    assert_eq!(acurite.name, "Acurite-609TXC");

    let converted = readings::latest_for_device(&db, "Acurite-609TXC")
        .await
        .unwrap()
        .unwrap();
    assert!((converted.temperature_f - 72.5).abs() < 1e-9);
    assert_eq!(converted.humidity_pct, 51);
}

#[tokio::test]
async fn test_glitch_sequence_through_feed() {
    let db = init_in_memory().await.unwrap();

    let feed = concat!(
        r#"{"time":"2024-06-01T12:00:00Z","model":"Cool-Sensor","temperature_F":60.0,"humidity":2}"#,
        "\n",
        r#"{"time":"2024-06-01T12:01:00Z","model":"Cool-Sensor","temperature_F":60.1,"humidity":99}"#,
        "\n",
        r#"{"time":"2024-06-01T12:00:00Z","model":"Warm-Sensor","temperature_F":75.0,"humidity":2}"#,
        "\n",
        r#"{"time":"2024-06-01T12:01:00Z","model":"Warm-Sensor","temperature_F":75.1,"humidity":99}"#,
        "\n",
    );

    let pipeline = IngestionPipeline::new(db.clone());
    pipeline.run(feed.as_bytes()).await;

    let cool = readings::latest_for_device(&db, "Cool-Sensor").await.unwrap().unwrap();
    assert_eq!(cool.humidity_pct, 2);
    assert_eq!(cool.temperature_f, 60.0);

    let warm = readings::latest_for_device(&db, "Warm-Sensor").await.unwrap().unwrap();
    assert_eq!(warm.humidity_pct, 1);
    assert_eq!(warm.temperature_f, 75.1);
}

#[tokio::test]
async fn test_storage_failure_does_not_stop_feed() {
    let db = init_in_memory().await.unwrap();
    sqlx::query("DROP TABLE weather_reports")
        .execute(&db)
        .await
        .unwrap();

    let feed = concat!(
        r#"{"time":"2024-06-01T12:00:00Z","model":"A","temperature_F":70.0,"humidity":30}"#,
        "\n",
        r#"{"time":"2024-06-01T12:00:30Z","model":"B","temperature_F":71.0,"humidity":31}"#,
        "\n",
    );

    let pipeline = IngestionPipeline::new(db.clone());
    let err = pipeline.run(feed.as_bytes()).await;

    // Both lines were attempted: registration precedes the failing lookup
    assert!(matches!(err, IngestError::FeedTerminated(_)));
    assert!(devices::list_with_counts(&db).await.is_err());
    assert!(devices::find(&db, "A").await.unwrap().is_some());
    assert!(devices::find(&db, "B").await.unwrap().is_some());
}
