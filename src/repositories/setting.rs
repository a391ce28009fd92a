//! Settings repository for database operations.

use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ConnectionTrait, EntityTrait};

use crate::entities::setting;

/// Repository for key/value settings.
pub struct SettingRepository;

impl SettingRepository {
    pub async fn get<C>(conn: &C, key: &str) -> Result<Option<String>>
    where
        C: ConnectionTrait,
    {
        Ok(setting::Entity::find_by_id(key.to_string())
            .one(conn)
            .await?
            .map(|s| s.value))
    }

    /// Insert or replace a value.
    pub async fn set<C>(conn: &C, key: &str, value: &str) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let model = setting::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value.to_string()),
        };
        setting::Entity::insert(model)
            .on_conflict(
                OnConflict::column(setting::Column::Key)
                    .update_column(setting::Column::Value)
                    .to_owned(),
            )
            .exec(conn)
            .await?;
        Ok(())
    }

    pub async fn remove<C>(conn: &C, key: &str) -> Result<()>
    where
        C: ConnectionTrait,
    {
        setting::Entity::delete_by_id(key.to_string()).exec(conn).await?;
        Ok(())
    }

    pub async fn clear<C>(conn: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        setting::Entity::delete_many().exec(conn).await?;
        Ok(())
    }
}
