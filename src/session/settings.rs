//! Key/value settings stores backing the session.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::repositories::SettingRepository;
use crate::storage::LocalStorage;

/// String key/value store injected into [`super::SessionService`].
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;

    async fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.get(key).await?.map(|v| v == "true"))
    }

    async fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.set(key, if value { "true" } else { "false" }).await
    }
}

/// Settings persisted in the local database's `settings` table.
pub struct DbSettingsStore {
    storage: Arc<Mutex<LocalStorage>>,
}

impl DbSettingsStore {
    pub fn new(storage: Arc<Mutex<LocalStorage>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl SettingsStore for DbSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let storage = self.storage.lock().await;
        SettingRepository::get(&storage.conn, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let storage = self.storage.lock().await;
        SettingRepository::set(&storage.conn, key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let storage = self.storage.lock().await;
        SettingRepository::remove(&storage.conn, key).await
    }

    async fn clear(&self) -> Result<()> {
        let storage = self.storage.lock().await;
        SettingRepository::clear(&storage.conn).await
    }
}

/// Volatile settings, for tests and embedding.
#[derive(Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.values.lock().await.clear();
        Ok(())
    }
}
