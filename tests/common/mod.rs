#![allow(dead_code)]

use std::sync::Arc;
use tokio::sync::Mutex;

use pantry::config::InventoryConfig;
use pantry::inventory::{InventoryService, NewItem};
use pantry::remote::MemoryRemoteStore;
use pantry::storage::LocalStorage;
use pantry::sync::SyncService;
use pantry::utils::datetime;

pub const USER: &str = "local_1700000000000_abcd1234";

pub struct Harness {
    pub storage: Arc<Mutex<LocalStorage>>,
    pub remote: Arc<MemoryRemoteStore>,
    pub inventory: InventoryService,
    pub sync: SyncService,
}

pub async fn harness() -> Harness {
    let storage = Arc::new(Mutex::new(LocalStorage::in_memory().await.unwrap()));
    let remote = Arc::new(MemoryRemoteStore::new());
    Harness {
        inventory: InventoryService::new(storage.clone(), InventoryConfig::default()),
        sync: SyncService::new(storage.clone(), remote.clone()),
        storage,
        remote,
    }
}

/// Product expiring `days` from today.
pub fn product(name: &str, days: i64, quantity: f64) -> NewItem {
    NewItem {
        name: name.to_string(),
        category: Some("Dairy".to_string()),
        expiration_date: datetime::format_date_with_offset(datetime::today(), days),
        quantity,
        unit: Some("l".to_string()),
        ..Default::default()
    }
}
