//! History repository for database operations.

use anyhow::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::history_event::{self, HistoryAction};

/// Repository for history event database operations.
pub struct HistoryRepository;

impl HistoryRepository {
    pub async fn insert<C>(conn: &C, event: history_event::ActiveModel) -> Result<history_event::Model>
    where
        C: ConnectionTrait,
    {
        Ok(event.insert(conn).await?)
    }

    pub async fn get_by_id<C>(conn: &C, uuid: &Uuid) -> Result<Option<history_event::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(history_event::Entity::find_by_id(*uuid).one(conn).await?)
    }

    /// All events for a user, newest first.
    pub async fn get_for_user<C>(conn: &C, user_id: &str) -> Result<Vec<history_event::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(history_event::Entity::find()
            .filter(history_event::Column::UserId.eq(user_id))
            .order_by_desc(history_event::Column::CreatedAt)
            .all(conn)
            .await?)
    }

    /// Events of one kind for a user, newest first.
    pub async fn get_by_action<C>(conn: &C, user_id: &str, action: HistoryAction) -> Result<Vec<history_event::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(history_event::Entity::find()
            .filter(history_event::Column::UserId.eq(user_id))
            .filter(history_event::Column::Action.eq(action.as_str()))
            .order_by_desc(history_event::Column::CreatedAt)
            .all(conn)
            .await?)
    }

    pub async fn delete<C>(conn: &C, event: history_event::Model) -> Result<()>
    where
        C: ConnectionTrait,
    {
        event.delete(conn).await?;
        Ok(())
    }

    /// Remove every event for a user, returning how many were deleted.
    pub async fn clear_for_user<C>(conn: &C, user_id: &str) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = history_event::Entity::delete_many()
            .filter(history_event::Column::UserId.eq(user_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
