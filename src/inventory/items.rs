use anyhow::Result;
use log::{debug, info};
use sea_orm::{ActiveValue, IntoActiveModel};
use uuid::Uuid;

use super::{ExpirySummary, InventoryError, InventoryService, NewItem, UpdateItem};
use crate::entities::inventory_item;
use crate::repositories::InventoryRepository;
use crate::storage::StoreChange;
use crate::utils::datetime::{self, ExpiryStatus};

fn validate_name(name: &str) -> Result<String, InventoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InventoryError::Validation("name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

fn validate_quantity(quantity: f64) -> Result<f64, InventoryError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(InventoryError::Validation(format!("quantity must be positive, got {}", quantity)));
    }
    Ok(quantity)
}

fn validate_date(date: &str) -> Result<String, InventoryError> {
    datetime::parse_date(date.trim())
        .map(datetime::format_ymd)
        .map_err(|_| InventoryError::Validation(format!("expiration date '{}' is not YYYY-MM-DD", date)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl InventoryService {
    /// Registers a new product for `user_id`. The item starts dirty with no remote id.
    ///
    /// # Errors
    /// Returns [`InventoryError::Validation`] for an empty name, non-positive
    /// quantity or malformed date, or a storage error.
    pub async fn add_item(&self, user_id: &str, item: NewItem) -> Result<inventory_item::Model> {
        let name = validate_name(&item.name)?;
        let quantity = validate_quantity(item.quantity)?;
        let expiration_date = validate_date(&item.expiration_date)?;
        let now = datetime::now_millis();

        let model = inventory_item::ActiveModel {
            uuid: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(user_id.to_string()),
            barcode: ActiveValue::Set(non_empty(item.barcode)),
            name: ActiveValue::Set(name),
            category: ActiveValue::Set(
                non_empty(item.category).unwrap_or_else(|| self.config.default_category.clone()),
            ),
            expiration_date: ActiveValue::Set(expiration_date),
            quantity: ActiveValue::Set(quantity),
            unit: ActiveValue::Set(non_empty(item.unit).unwrap_or_else(|| self.config.default_unit.clone())),
            image_url: ActiveValue::Set(non_empty(item.image_url)),
            is_my_product: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            is_dirty: ActiveValue::Set(true),
            remote_id: ActiveValue::Set(None),
            last_synced: ActiveValue::Set(None),
            is_deleted: ActiveValue::Set(false),
        };

        let storage = self.storage.lock().await;
        let created = InventoryRepository::insert(&storage.conn, model).await?;
        storage.notify(StoreChange::ItemUpserted(created.uuid));
        info!("Added item '{}' ({})", created.name, created.uuid);
        Ok(created)
    }

    /// Applies a partial edit and marks the item dirty.
    pub async fn update_item(&self, uuid: &Uuid, update: UpdateItem) -> Result<inventory_item::Model> {
        let storage = self.storage.lock().await;
        let existing = Self::require_active(&storage.conn, uuid).await?;
        let mut active = existing.into_active_model();

        if let Some(name) = update.name {
            active.name = ActiveValue::Set(validate_name(&name)?);
        }
        if let Some(category) = update.category {
            active.category =
                ActiveValue::Set(non_empty(Some(category)).unwrap_or_else(|| self.config.default_category.clone()));
        }
        if let Some(date) = update.expiration_date {
            active.expiration_date = ActiveValue::Set(validate_date(&date)?);
        }
        if let Some(quantity) = update.quantity {
            active.quantity = ActiveValue::Set(validate_quantity(quantity)?);
        }
        if let Some(unit) = update.unit {
            active.unit = ActiveValue::Set(non_empty(Some(unit)).unwrap_or_else(|| self.config.default_unit.clone()));
        }
        if let Some(barcode) = update.barcode {
            active.barcode = ActiveValue::Set(non_empty(barcode));
        }
        if let Some(image_url) = update.image_url {
            active.image_url = ActiveValue::Set(non_empty(image_url));
        }
        active.is_dirty = ActiveValue::Set(true);
        active.updated_at = ActiveValue::Set(datetime::now_millis());

        let updated = InventoryRepository::update(&storage.conn, active).await?;
        storage.notify(StoreChange::ItemUpserted(updated.uuid));
        debug!("Updated item {}", updated.uuid);
        Ok(updated)
    }

    /// Soft-deletes an item. It disappears from every active query at once and
    /// is purged by the next reconciliation.
    pub async fn delete_item(&self, uuid: &Uuid) -> Result<()> {
        let storage = self.storage.lock().await;
        let existing = Self::require_active(&storage.conn, uuid).await?;
        Self::soft_delete(&storage.conn, existing).await?;
        storage.notify(StoreChange::ItemUpserted(*uuid));
        info!("Deleted item {}", uuid);
        Ok(())
    }

    /// Get a single active item.
    pub async fn get_item(&self, uuid: &Uuid) -> Result<Option<inventory_item::Model>> {
        let storage = self.storage.lock().await;
        Ok(InventoryRepository::get_by_id(&storage.conn, uuid)
            .await?
            .filter(|item| !item.is_deleted))
    }

    pub async fn get_active_items(&self, user_id: &str) -> Result<Vec<inventory_item::Model>> {
        let storage = self.storage.lock().await;
        InventoryRepository::get_active_for_user(&storage.conn, user_id).await
    }

    pub async fn search_items(&self, user_id: &str, query: &str) -> Result<Vec<inventory_item::Model>> {
        let storage = self.storage.lock().await;
        InventoryRepository::search(&storage.conn, user_id, query.trim()).await
    }

    pub async fn get_items_by_category(&self, user_id: &str, category: &str) -> Result<Vec<inventory_item::Model>> {
        let storage = self.storage.lock().await;
        InventoryRepository::get_by_category(&storage.conn, user_id, category).await
    }

    pub async fn get_item_by_barcode(&self, user_id: &str, barcode: &str) -> Result<Option<inventory_item::Model>> {
        let storage = self.storage.lock().await;
        InventoryRepository::get_by_barcode(&storage.conn, user_id, barcode).await
    }

    pub async fn get_categories(&self, user_id: &str) -> Result<Vec<String>> {
        let storage = self.storage.lock().await;
        InventoryRepository::categories(&storage.conn, user_id).await
    }

    /// Active items expiring between today and `within_days` from today, inclusive.
    pub async fn get_expiring_items(&self, user_id: &str, within_days: i64) -> Result<Vec<inventory_item::Model>> {
        let today = datetime::today();
        let from = datetime::format_ymd(today);
        let until = datetime::format_date_with_offset(today, within_days.max(0));
        let storage = self.storage.lock().await;
        InventoryRepository::expiring_between(&storage.conn, user_id, &from, &until).await
    }

    /// Active items already past their expiration date.
    pub async fn get_expired_items(&self, user_id: &str) -> Result<Vec<inventory_item::Model>> {
        let today = datetime::format_ymd(datetime::today());
        let storage = self.storage.lock().await;
        InventoryRepository::expired_before(&storage.conn, user_id, &today).await
    }

    /// Bucket every active item by expiry status.
    pub async fn expiry_summary(&self, user_id: &str) -> Result<ExpirySummary> {
        let items = self.get_active_items(user_id).await?;
        let today = datetime::today();
        let mut summary = ExpirySummary::default();
        for item in &items {
            match ExpiryStatus::classify_str(&item.expiration_date, today, self.config.expiring_soon_days) {
                ExpiryStatus::Expired => summary.expired += 1,
                ExpiryStatus::ExpiresToday => summary.expires_today += 1,
                ExpiryStatus::ExpiringSoon(_) => summary.expiring_soon += 1,
                ExpiryStatus::Fresh => summary.fresh += 1,
            }
        }
        Ok(summary)
    }

    pub(super) async fn require_active<C>(conn: &C, uuid: &Uuid) -> Result<inventory_item::Model>
    where
        C: sea_orm::ConnectionTrait,
    {
        match InventoryRepository::get_by_id(conn, uuid).await? {
            Some(item) if item.is_deleted => Err(InventoryError::Deleted(*uuid).into()),
            Some(item) => Ok(item),
            None => Err(InventoryError::NotFound(*uuid).into()),
        }
    }

    pub(super) async fn soft_delete<C>(conn: &C, item: inventory_item::Model) -> Result<inventory_item::Model>
    where
        C: sea_orm::ConnectionTrait,
    {
        let mut active = item.into_active_model();
        active.is_deleted = ActiveValue::Set(true);
        active.is_dirty = ActiveValue::Set(true);
        active.updated_at = ActiveValue::Set(datetime::now_millis());
        InventoryRepository::update(conn, active).await
    }
}
