use anyhow::Result;
use log::info;
use sea_orm::{ActiveValue, IntoActiveModel, TransactionTrait};
use uuid::Uuid;

use super::{InventoryError, InventoryService};
use crate::entities::history_event::{self, HistoryAction};
use crate::entities::inventory_item;
use crate::repositories::{HistoryRepository, InventoryRepository};
use crate::storage::StoreChange;
use crate::utils::datetime;
use crate::utils::quantity::format_quantity;

/// Remaining quantities at or below this are treated as fully consumed.
const CONSUMED_EPSILON: f64 = 1e-9;

fn history_snapshot(
    item: &inventory_item::Model,
    action: HistoryAction,
    amount: f64,
) -> history_event::ActiveModel {
    history_event::ActiveModel {
        uuid: ActiveValue::Set(Uuid::new_v4()),
        user_id: ActiveValue::Set(item.user_id.clone()),
        item_uuid: ActiveValue::Set(Some(item.uuid)),
        product_name: ActiveValue::Set(item.name.clone()),
        category: ActiveValue::Set(item.category.clone()),
        action: ActiveValue::Set(action.as_str().to_string()),
        quantity_description: ActiveValue::Set(format_quantity(amount, &item.unit)),
        created_at: ActiveValue::Set(datetime::now_millis()),
    }
}

impl InventoryService {
    /// Records that `amount` of an item was used.
    ///
    /// The item's quantity shrinks by `amount`; using all of it (or more)
    /// soft-deletes the item and the event records the quantity actually left.
    pub async fn log_usage(&self, uuid: &Uuid, amount: f64) -> Result<history_event::Model> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(InventoryError::Validation(format!("used amount must be positive, got {}", amount)).into());
        }

        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let item = Self::require_active(&txn, uuid).await?;
        let used = amount.min(item.quantity);
        let remaining = item.quantity - used;
        let event = HistoryRepository::insert(&txn, history_snapshot(&item, HistoryAction::Used, used)).await?;

        if remaining <= CONSUMED_EPSILON {
            Self::soft_delete(&txn, item).await?;
        } else {
            let mut active = item.into_active_model();
            active.quantity = ActiveValue::Set(remaining);
            active.is_dirty = ActiveValue::Set(true);
            active.updated_at = ActiveValue::Set(datetime::now_millis());
            InventoryRepository::update(&txn, active).await?;
        }

        txn.commit().await?;
        storage.notify(StoreChange::HistoryAppended(event.uuid));
        storage.notify(StoreChange::ItemUpserted(*uuid));
        info!("Logged usage of {} ({})", event.product_name, event.quantity_description);
        Ok(event)
    }

    /// Records that the whole remaining quantity was thrown away and soft-deletes the item.
    pub async fn discard_item(&self, uuid: &Uuid) -> Result<history_event::Model> {
        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let item = Self::require_active(&txn, uuid).await?;
        let event =
            HistoryRepository::insert(&txn, history_snapshot(&item, HistoryAction::Discarded, item.quantity)).await?;
        Self::soft_delete(&txn, item).await?;

        txn.commit().await?;
        storage.notify(StoreChange::HistoryAppended(event.uuid));
        storage.notify(StoreChange::ItemUpserted(*uuid));
        info!("Discarded {} ({})", event.product_name, event.quantity_description);
        Ok(event)
    }

    /// All history for a user, newest first.
    pub async fn get_history(&self, user_id: &str) -> Result<Vec<history_event::Model>> {
        let storage = self.storage.lock().await;
        HistoryRepository::get_for_user(&storage.conn, user_id).await
    }

    pub async fn get_history_by_action(
        &self,
        user_id: &str,
        action: HistoryAction,
    ) -> Result<Vec<history_event::Model>> {
        let storage = self.storage.lock().await;
        HistoryRepository::get_by_action(&storage.conn, user_id, action).await
    }

    pub async fn delete_history_event(&self, uuid: &Uuid) -> Result<()> {
        let storage = self.storage.lock().await;
        let event = HistoryRepository::get_by_id(&storage.conn, uuid)
            .await?
            .ok_or(InventoryError::HistoryNotFound(*uuid))?;
        HistoryRepository::delete(&storage.conn, event).await?;
        storage.notify(StoreChange::HistoryRemoved(*uuid));
        Ok(())
    }

    /// Remove every history event of a user, returning how many were removed.
    pub async fn clear_history(&self, user_id: &str) -> Result<u64> {
        let storage = self.storage.lock().await;
        let removed = HistoryRepository::clear_for_user(&storage.conn, user_id).await?;
        storage.notify(StoreChange::HistoryCleared);
        info!("Cleared {} history events", removed);
        Ok(removed)
    }
}
