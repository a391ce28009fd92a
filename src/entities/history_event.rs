//! History entity: an immutable log line for a used or discarded product.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "history_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    pub user_id: String,
    pub item_uuid: Option<Uuid>,
    pub product_name: String,
    pub category: String,
    /// Stored form of [`HistoryAction`].
    pub action: String,
    pub quantity_description: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_item::Entity",
        from = "Column::ItemUuid",
        to = "super::inventory_item::Column::Uuid",
        on_delete = "SetNull"
    )]
    Item,
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn action(&self) -> Option<HistoryAction> {
        self.action.parse().ok()
    }
}

/// What happened to the product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryAction {
    Used,
    Discarded,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Used => "USED",
            HistoryAction::Discarded => "DISCARDED",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USED" => Ok(HistoryAction::Used),
            "DISCARDED" => Ok(HistoryAction::Discarded),
            other => Err(anyhow::anyhow!("Unknown history action: {}", other)),
        }
    }
}
