use anyhow::{Context, Result};
use log::{debug, info};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::entities::{history_event, inventory_item, setting};

/// Capacity of the change-stream buffer; slow subscribers see `Lagged`.
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// A mutation observed on the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// An inventory item was inserted or modified (including soft deletes).
    ItemUpserted(Uuid),
    /// An inventory item was physically removed.
    ItemRemoved(Uuid),
    HistoryAppended(Uuid),
    HistoryRemoved(Uuid),
    HistoryCleared,
}

/// Local storage manager for inventory data
pub struct LocalStorage {
    pub conn: DatabaseConnection,
    changes: broadcast::Sender<StoreChange>,
}

impl LocalStorage {
    /// Open the database described by `config`, creating tables as needed.
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let database_url = if config.in_memory {
            // Each storage gets its own shared-cache memory database
            format!("sqlite:file:pantry_{}?mode=memory&cache=shared", Uuid::new_v4().simple())
        } else {
            let path = match &config.database_path {
                Some(path) => PathBuf::from(path),
                None => Self::default_database_path()?,
            };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
            }
            format!("sqlite://{}?mode=rwc", path.display())
        };

        let mut options = ConnectOptions::new(database_url.clone());
        options.sqlx_logging(false);
        if config.in_memory {
            // The memory database lives only as long as one connection stays open
            options
                .min_connections(1)
                .max_connections(1)
                .max_lifetime(Duration::from_secs(60 * 60 * 24 * 365));
        }

        let conn = Database::connect(options)
            .await
            .with_context(|| format!("Failed to open database: {}", database_url))?;

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let storage = LocalStorage { conn, changes };
        storage.init_schema().await?;
        info!("Local storage ready ({})", if config.in_memory { "memory" } else { "file" });

        Ok(storage)
    }

    /// Open a throwaway in-memory store.
    pub async fn in_memory() -> Result<Self> {
        Self::new(&StorageConfig {
            in_memory: true,
            database_path: None,
        })
        .await
    }

    /// Default database location under the platform data directory
    pub fn default_database_path() -> Result<PathBuf> {
        dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join("pantry").join("pantry.db"))
    }

    /// Initialize database schema from the entity definitions
    async fn init_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let mut items = schema.create_table_from_entity(inventory_item::Entity);
        items.if_not_exists();
        self.conn.execute(backend.build(&items)).await?;

        let mut history = schema.create_table_from_entity(history_event::Entity);
        history.if_not_exists();
        self.conn.execute(backend.build(&history)).await?;

        let mut settings = schema.create_table_from_entity(setting::Entity);
        settings.if_not_exists();
        self.conn.execute(backend.build(&settings)).await?;

        debug!("Schema initialized");
        Ok(())
    }

    /// Subscribe to the store's change stream.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// Publish a change. Having no subscribers is not an error.
    pub fn notify(&self, change: StoreChange) {
        let _ = self.changes.send(change);
    }

    /// Check if the database has any inventory items
    pub async fn has_data(&self) -> Result<bool> {
        use sea_orm::PaginatorTrait;
        let count = inventory_item::Entity::find().count(&self.conn).await?;
        Ok(count > 0)
    }

    /// Clear all data from the database
    pub async fn clear_all_data(&self) -> Result<()> {
        history_event::Entity::delete_many().exec(&self.conn).await?;
        inventory_item::Entity::delete_many().exec(&self.conn).await?;
        setting::Entity::delete_many().exec(&self.conn).await?;
        self.notify(StoreChange::HistoryCleared);
        Ok(())
    }
}
