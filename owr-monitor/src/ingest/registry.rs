//! Device catalog registration

use super::IngestError;
use owr_common::db::{devices, DeviceCatalogEntry};
use sqlx::SqlitePool;
use tracing::info;

/// Ensures every observed device model has a catalog entry
#[derive(Clone)]
pub struct DeviceRegistry {
    db: SqlitePool,
}

impl DeviceRegistry {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create the catalog entry for `device_model` if it does not exist yet
    ///
    /// The display name starts out equal to the device model. Repeated or
    /// concurrent calls are harmless. Returns `true` when an entry was created.
    pub async fn ensure_registered(&self, device_model: &str) -> Result<bool, IngestError> {
        let entry = DeviceCatalogEntry {
            device_model: device_model.to_string(),
            name: device_model.to_string(),
        };

        let created = devices::insert_if_absent(&self.db, &entry).await?;
        if created {
            info!(device_model = %device_model, "Registered new device");
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owr_common::db::init_in_memory;

    #[tokio::test]
    async fn test_ensure_registered_twice_creates_one_entry() {
        let pool = init_in_memory().await.unwrap();
        let registry = DeviceRegistry::new(pool.clone());

        assert!(registry.ensure_registered("Acurite-Tower").await.unwrap());
        assert!(!registry.ensure_registered("Acurite-Tower").await.unwrap());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM device_models WHERE device_model = ?")
            .bind("Acurite-Tower")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let entry = devices::find(&pool, "Acurite-Tower").await.unwrap().unwrap();
        assert_eq!(entry.name, "Acurite-Tower");
    }

    #[tokio::test]
    async fn test_concurrent_registration_creates_one_entry() {
        let pool = init_in_memory().await.unwrap();
        let registry = DeviceRegistry::new(pool.clone());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry.ensure_registered("Fineoffset-WH2").await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces() {
        let pool = init_in_memory().await.unwrap();
        pool.close().await;
        let registry = DeviceRegistry::new(pool);

        let result = registry.ensure_registered("X").await;
        assert!(matches!(result, Err(IngestError::StorageUnavailable(_))));
    }
}
