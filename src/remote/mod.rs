//! Remote document store abstraction.
//!
//! This module defines the interface the sync orchestrator uses to talk to a
//! per-user cloud document collection, along with the document shape and
//! error types shared by every implementation.

use async_trait::async_trait;
use serde_json::{Map, Value};

pub mod document;
pub mod factory;
pub mod file;
pub mod memory;

pub use document::ProductDocument;
pub use factory::create_remote_store;
pub use file::FileRemoteStore;
pub use memory::MemoryRemoteStore;

/// Top-level collection holding one sub-tree per user.
pub const USER_COLLECTION: &str = "user_products";
/// Per-user sub-collection holding product documents.
pub const PRODUCTS_COLLECTION: &str = "products";

/// Common error types for remote store operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Remote store error: {0}")]
    Other(String),
}

/// Flat key/value fields of a stored document.
pub type DocumentFields = Map<String, Value>;

/// A document as returned by the store, keyed by its store-assigned id.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteDocument {
    pub id: String,
    pub fields: DocumentFields,
}

/// Path of a user's product collection, e.g. `user_products/u1/products`.
pub fn collection_path(user_id: &str) -> String {
    format!("{}/{}/{}", USER_COLLECTION, user_id, PRODUCTS_COLLECTION)
}

/// Interface every remote document store must implement.
///
/// Calls suspend the invoking task until the store answers. No retries or
/// timeouts are applied on top of what the transport itself does.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Returns the store type identifier (e.g., "memory", "file").
    fn store_type(&self) -> &str;

    /// Create a document in the user's collection and return its assigned id.
    async fn create_document(&self, user_id: &str, fields: DocumentFields) -> Result<String, RemoteError>;

    /// Merge-write: supplied fields replace their stored values, other stored fields are kept.
    async fn merge_document(&self, user_id: &str, doc_id: &str, fields: DocumentFields) -> Result<(), RemoteError>;

    /// Every document in the user's collection.
    async fn list_documents(&self, user_id: &str) -> Result<Vec<RemoteDocument>, RemoteError>;

    /// Delete a document. Returns [`RemoteError::NotFound`] when it does not exist.
    async fn delete_document(&self, user_id: &str, doc_id: &str) -> Result<(), RemoteError>;
}
