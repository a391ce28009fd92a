//! Mapping between local inventory items and remote product documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DocumentFields, RemoteError};
use crate::entities::inventory_item;
use crate::utils::datetime;

/// Wire shape of a product document. Field names follow the remote schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub expiration_date: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub last_synced: Option<i64>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub is_dirty: bool,
    #[serde(default = "default_is_my_product")]
    pub is_my_product: bool,
    #[serde(default)]
    pub user_id: String,
}

fn default_is_my_product() -> bool {
    true
}

impl ProductDocument {
    /// Snapshot of `item` as it will be stored remotely once synced at `synced_at`.
    pub fn from_item(item: &inventory_item::Model, synced_at: i64) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            expiration_date: item.expiration_date.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            barcode: item.barcode.clone(),
            image_url: item.image_url.clone(),
            created_at: item.created_at,
            last_synced: Some(synced_at),
            is_deleted: item.is_deleted,
            is_dirty: false,
            is_my_product: item.is_my_product,
            user_id: item.user_id.clone(),
        }
    }

    /// Parse raw document fields, validating the expiration date and quantity.
    pub fn from_fields(fields: &DocumentFields) -> Result<Self, RemoteError> {
        let doc: ProductDocument = serde_json::from_value(Value::Object(fields.clone()))
            .map_err(|e| RemoteError::InvalidData(e.to_string()))?;

        if datetime::parse_date(&doc.expiration_date).is_err() {
            return Err(RemoteError::InvalidData(format!(
                "expirationDate '{}' is not a YYYY-MM-DD date",
                doc.expiration_date
            )));
        }
        if !doc.quantity.is_finite() || doc.quantity < 0.0 {
            return Err(RemoteError::InvalidData(format!("quantity {} is not valid", doc.quantity)));
        }

        Ok(doc)
    }

    pub fn to_fields(&self) -> Result<DocumentFields, RemoteError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(RemoteError::InvalidData(format!("document serialized to {}", other))),
            Err(e) => Err(RemoteError::InvalidData(e.to_string())),
        }
    }

    /// Remote sync stamp, with a missing value ordering before any real one.
    pub fn sync_stamp(&self) -> i64 {
        self.last_synced.unwrap_or(0)
    }
}
