//! Inventory item repository for database operations.

use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entities::inventory_item;

/// Repository for inventory item database operations.
pub struct InventoryRepository;

impl InventoryRepository {
    /// Get a single item by UUID, deleted or not.
    pub async fn get_by_id<C>(conn: &C, uuid: &Uuid) -> Result<Option<inventory_item::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(inventory_item::Entity::find_by_id(*uuid).one(conn).await?)
    }

    /// Get the item that references a remote document.
    pub async fn get_by_remote_id<C>(conn: &C, remote_id: &str) -> Result<Option<inventory_item::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(inventory_item::Entity::find()
            .filter(inventory_item::Column::RemoteId.eq(remote_id))
            .one(conn)
            .await?)
    }

    /// Active items for a user, soonest expiration first.
    pub async fn get_active_for_user<C>(conn: &C, user_id: &str) -> Result<Vec<inventory_item::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(inventory_item::Entity::active_for(user_id)
            .order_by_asc(inventory_item::Column::ExpirationDate)
            .order_by_asc(inventory_item::Column::Name)
            .all(conn)
            .await?)
    }

    /// Items with local changes waiting for upload.
    pub async fn get_dirty_for_user<C>(conn: &C, user_id: &str) -> Result<Vec<inventory_item::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(inventory_item::Entity::active_for(user_id)
            .filter(inventory_item::Column::IsDirty.eq(true))
            .order_by_asc(inventory_item::Column::CreatedAt)
            .all(conn)
            .await?)
    }

    /// Soft-deleted items waiting for the purge.
    pub async fn get_deleted_for_user<C>(conn: &C, user_id: &str) -> Result<Vec<inventory_item::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(inventory_item::Entity::find()
            .filter(inventory_item::Column::UserId.eq(user_id))
            .filter(inventory_item::Column::IsDeleted.eq(true))
            .all(conn)
            .await?)
    }

    /// Search active items by name, category or barcode.
    pub async fn search<C>(conn: &C, user_id: &str, query: &str) -> Result<Vec<inventory_item::Model>>
    where
        C: ConnectionTrait,
    {
        let pattern = format!("%{}%", query);
        Ok(inventory_item::Entity::active_for(user_id)
            .filter(
                Expr::col(inventory_item::Column::Name)
                    .like(pattern.clone())
                    .or(Expr::col(inventory_item::Column::Category).like(pattern.clone()))
                    .or(Expr::col(inventory_item::Column::Barcode).like(pattern)),
            )
            .order_by_asc(inventory_item::Column::ExpirationDate)
            .all(conn)
            .await?)
    }

    /// Active items in one category.
    pub async fn get_by_category<C>(conn: &C, user_id: &str, category: &str) -> Result<Vec<inventory_item::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(inventory_item::Entity::active_for(user_id)
            .filter(inventory_item::Column::Category.eq(category))
            .order_by_asc(inventory_item::Column::ExpirationDate)
            .all(conn)
            .await?)
    }

    /// Active item carrying a barcode.
    pub async fn get_by_barcode<C>(conn: &C, user_id: &str, barcode: &str) -> Result<Option<inventory_item::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(inventory_item::Entity::active_for(user_id)
            .filter(inventory_item::Column::Barcode.eq(barcode))
            .one(conn)
            .await?)
    }

    /// Distinct categories in use, alphabetical.
    pub async fn categories<C>(conn: &C, user_id: &str) -> Result<Vec<String>>
    where
        C: ConnectionTrait,
    {
        Ok(inventory_item::Entity::active_for(user_id)
            .select_only()
            .column(inventory_item::Column::Category)
            .distinct()
            .order_by_asc(inventory_item::Column::Category)
            .into_tuple::<String>()
            .all(conn)
            .await?)
    }

    /// Active items expiring on or after `from` and on or before `until`.
    pub async fn expiring_between<C>(
        conn: &C,
        user_id: &str,
        from: &str,
        until: &str,
    ) -> Result<Vec<inventory_item::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(inventory_item::Entity::active_for(user_id)
            .filter(inventory_item::Column::ExpirationDate.gte(from))
            .filter(inventory_item::Column::ExpirationDate.lte(until))
            .order_by_asc(inventory_item::Column::ExpirationDate)
            .all(conn)
            .await?)
    }

    /// Active items whose expiration date is strictly before `date`.
    pub async fn expired_before<C>(conn: &C, user_id: &str, date: &str) -> Result<Vec<inventory_item::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(inventory_item::Entity::active_for(user_id)
            .filter(inventory_item::Column::ExpirationDate.lt(date))
            .order_by_asc(inventory_item::Column::ExpirationDate)
            .all(conn)
            .await?)
    }

    /// Record a successful upload of `uuid` as `remote_id` at `synced_at`.
    ///
    /// The dirty flag is cleared only when the item still carries
    /// `seen_updated_at`, so edits made while the upload was in flight stay
    /// pending. Returns whether the flag was cleared.
    pub async fn mark_synced<C>(
        conn: &C,
        uuid: &Uuid,
        remote_id: &str,
        synced_at: i64,
        seen_updated_at: i64,
    ) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        inventory_item::Entity::update_many()
            .col_expr(inventory_item::Column::RemoteId, Expr::value(remote_id))
            .col_expr(inventory_item::Column::LastSynced, Expr::value(synced_at))
            .filter(inventory_item::Column::Uuid.eq(*uuid))
            .exec(conn)
            .await?;

        let cleared = inventory_item::Entity::update_many()
            .col_expr(inventory_item::Column::IsDirty, Expr::value(false))
            .filter(inventory_item::Column::Uuid.eq(*uuid))
            .filter(inventory_item::Column::UpdatedAt.eq(seen_updated_at))
            .filter(inventory_item::Column::IsDeleted.eq(false))
            .exec(conn)
            .await?;
        Ok(cleared.rows_affected > 0)
    }

    /// Find a record of `user_id` that was never linked to a remote document
    /// but matches one by name and creation time.
    pub async fn find_unlinked<C>(
        conn: &C,
        user_id: &str,
        name: &str,
        created_at: i64,
    ) -> Result<Option<inventory_item::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(inventory_item::Entity::find()
            .filter(inventory_item::Column::UserId.eq(user_id))
            .filter(inventory_item::Column::RemoteId.is_null())
            .filter(inventory_item::Column::Name.eq(name))
            .filter(inventory_item::Column::CreatedAt.eq(created_at))
            .one(conn)
            .await?)
    }

    /// Insert a new item.
    pub async fn insert<C>(conn: &C, item: inventory_item::ActiveModel) -> Result<inventory_item::Model>
    where
        C: ConnectionTrait,
    {
        Ok(item.insert(conn).await?)
    }

    /// Update an item in the database.
    pub async fn update<C>(conn: &C, item: inventory_item::ActiveModel) -> Result<inventory_item::Model>
    where
        C: ConnectionTrait,
    {
        Ok(item.update(conn).await?)
    }

    /// Physically delete an item from the database.
    pub async fn delete<C>(conn: &C, item: inventory_item::Model) -> Result<()>
    where
        C: ConnectionTrait,
    {
        item.delete(conn).await?;
        Ok(())
    }
}
