mod common;

use common::{harness, product, USER};
use pantry::config::StorageConfig;
use pantry::repositories::{InventoryRepository, SettingRepository};
use pantry::storage::{LocalStorage, StoreChange};

#[tokio::test]
async fn test_in_memory_storage_starts_empty() {
    let storage = LocalStorage::in_memory().await.unwrap();
    assert!(!storage.has_data().await.unwrap());
}

#[tokio::test]
async fn test_in_memory_stores_are_isolated() {
    let a = harness().await;
    let b = harness().await;
    a.inventory.add_item(USER, product("Milk", 3, 1.0)).await.unwrap();

    assert!(a.storage.lock().await.has_data().await.unwrap());
    assert!(!b.storage.lock().await.has_data().await.unwrap());
}

#[tokio::test]
async fn test_clear_all_data() {
    let h = harness().await;
    let milk = h.inventory.add_item(USER, product("Milk", 3, 1.0)).await.unwrap();
    h.inventory.log_usage(&milk.uuid, 0.5).await.unwrap();

    let storage = h.storage.lock().await;
    SettingRepository::set(&storage.conn, "user_id", USER).await.unwrap();
    let mut changes = storage.subscribe();

    storage.clear_all_data().await.unwrap();
    assert!(!storage.has_data().await.unwrap());
    assert!(SettingRepository::get(&storage.conn, "user_id").await.unwrap().is_none());
    assert_eq!(changes.recv().await.unwrap(), StoreChange::HistoryCleared);
}

#[tokio::test]
async fn test_mutations_are_broadcast() {
    let h = harness().await;
    let mut changes = h.storage.lock().await.subscribe();

    let milk = h.inventory.add_item(USER, product("Milk", 3, 1.0)).await.unwrap();
    assert_eq!(changes.recv().await.unwrap(), StoreChange::ItemUpserted(milk.uuid));

    h.inventory.delete_item(&milk.uuid).await.unwrap();
    assert_eq!(changes.recv().await.unwrap(), StoreChange::ItemUpserted(milk.uuid));
}

#[tokio::test]
async fn test_mark_synced_keeps_concurrent_edit_dirty() {
    let h = harness().await;
    let milk = h.inventory.add_item(USER, product("Milk", 3, 1.0)).await.unwrap();

    let storage = h.storage.lock().await;
    let stale = milk.updated_at - 1;
    let cleared = InventoryRepository::mark_synced(&storage.conn, &milk.uuid, "doc-1", 42, stale)
        .await
        .unwrap();
    assert!(!cleared);

    let item = InventoryRepository::get_by_id(&storage.conn, &milk.uuid).await.unwrap().unwrap();
    assert!(item.is_dirty);
    assert_eq!(item.remote_id.as_deref(), Some("doc-1"));
    assert_eq!(item.last_synced, Some(42));

    let cleared = InventoryRepository::mark_synced(&storage.conn, &milk.uuid, "doc-1", 43, milk.updated_at)
        .await
        .unwrap();
    assert!(cleared);
}

#[tokio::test]
async fn test_file_database_persists_between_opens() {
    let dir = std::env::temp_dir().join(format!("pantry-db-{}", uuid::Uuid::new_v4().simple()));
    std::fs::create_dir_all(&dir).unwrap();
    let config = StorageConfig {
        database_path: Some(dir.join("pantry.db").display().to_string()),
        in_memory: false,
    };

    {
        let storage = LocalStorage::new(&config).await.unwrap();
        SettingRepository::set(&storage.conn, "user_id", USER).await.unwrap();
    }

    let reopened = LocalStorage::new(&config).await.unwrap();
    assert_eq!(
        SettingRepository::get(&reopened.conn, "user_id").await.unwrap().as_deref(),
        Some(USER)
    );

    let _ = std::fs::remove_dir_all(&dir);
}
