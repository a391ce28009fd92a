//! Inventory item entity: one product on the user's shelves.

use sea_orm::entity::prelude::*;
use sea_orm::QueryFilter;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    pub user_id: String,
    pub barcode: Option<String>,
    pub name: String,
    pub category: String,
    /// Calendar date in `YYYY-MM-DD` form.
    pub expiration_date: String,
    pub quantity: f64,
    pub unit: String,
    pub image_url: Option<String>,
    pub is_my_product: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub is_dirty: bool,
    #[sea_orm(unique)]
    pub remote_id: Option<String>,
    pub last_synced: Option<i64>,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::history_event::Entity")]
    HistoryEvents,
}

impl Related<super::history_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HistoryEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Items visible to the user: owned by `user_id` and not soft-deleted.
    pub fn active_for(user_id: &str) -> Select<Entity> {
        Self::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsDeleted.eq(false))
    }
}
