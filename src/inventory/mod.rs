//! Inventory service: the data layer callers use to manage products and history.
//!
//! Every mutation goes straight to the local store, marks the affected item
//! dirty, and publishes a [`StoreChange`](crate::storage::StoreChange) so views
//! can refresh. Reconciliation with the remote store is left to
//! [`SyncService`](crate::sync::SyncService).

pub mod history;
pub mod items;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use crate::config::InventoryConfig;
use crate::storage::{LocalStorage, StoreChange};

/// Validation and lookup failures of inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Item not found: {0}")]
    NotFound(Uuid),

    #[error("Item was deleted: {0}")]
    Deleted(Uuid),

    #[error("History event not found: {0}")]
    HistoryNotFound(Uuid),

    #[error("Invalid item: {0}")]
    Validation(String),
}

/// Arguments for registering a new product.
#[derive(Clone, Debug, Default)]
pub struct NewItem {
    pub name: String,
    pub category: Option<String>,
    /// `YYYY-MM-DD`
    pub expiration_date: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub barcode: Option<String>,
    pub image_url: Option<String>,
}

/// Arguments for editing a product. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub category: Option<String>,
    pub expiration_date: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub barcode: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
}

/// Counts of active items per expiry bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirySummary {
    pub expired: usize,
    pub expires_today: usize,
    pub expiring_soon: usize,
    pub fresh: usize,
}

impl ExpirySummary {
    pub fn total(&self) -> usize {
        self.expired + self.expires_today + self.expiring_soon + self.fresh
    }
}

/// Service for inventory and history operations over the local store.
#[derive(Clone)]
pub struct InventoryService {
    storage: Arc<Mutex<LocalStorage>>,
    config: InventoryConfig,
}

impl InventoryService {
    pub fn new(storage: Arc<Mutex<LocalStorage>>, config: InventoryConfig) -> Self {
        Self { storage, config }
    }

    /// Subscribe to changes made through the local store.
    pub async fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.storage.lock().await.subscribe()
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }
}
