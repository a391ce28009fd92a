//! In-process remote store.
//!
//! Keeps collections in a map keyed by collection path. Useful for embedding
//! and for exercising the sync orchestrator without a network.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use super::{collection_path, DocumentFields, RemoteDocument, RemoteError, RemoteStore};

#[derive(Default)]
pub struct MemoryRemoteStore {
    collections: Mutex<HashMap<String, BTreeMap<String, DocumentFields>>>,
    next_id: AtomicU64,
    offline: AtomicBool,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline, every call fails with [`RemoteError::Network`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Store raw fields under a chosen id, bypassing validation.
    pub fn insert_raw(&self, user_id: &str, doc_id: &str, fields: DocumentFields) {
        if let Ok(mut collections) = self.collections.lock() {
            collections
                .entry(collection_path(user_id))
                .or_default()
                .insert(doc_id.to_string(), fields);
        }
    }

    /// Fields of one document, if present.
    pub fn get(&self, user_id: &str, doc_id: &str) -> Option<DocumentFields> {
        self.collections
            .lock()
            .ok()?
            .get(&collection_path(user_id))?
            .get(doc_id)
            .cloned()
    }

    pub fn document_count(&self, user_id: &str) -> usize {
        self.collections
            .lock()
            .ok()
            .and_then(|c| c.get(&collection_path(user_id)).map(|docs| docs.len()))
            .unwrap_or(0)
    }

    fn check_online(&self) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RemoteError::Network("remote store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, BTreeMap<String, DocumentFields>>>, RemoteError> {
        self.collections
            .lock()
            .map_err(|_| RemoteError::Other("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    fn store_type(&self) -> &str {
        "memory"
    }

    async fn create_document(&self, user_id: &str, fields: DocumentFields) -> Result<String, RemoteError> {
        self.check_online()?;
        let id = format!("doc{:06}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.lock()?
            .entry(collection_path(user_id))
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn merge_document(&self, user_id: &str, doc_id: &str, fields: DocumentFields) -> Result<(), RemoteError> {
        self.check_online()?;
        let mut collections = self.lock()?;
        // Merge writes create the document when it does not exist yet
        let stored = collections
            .entry(collection_path(user_id))
            .or_default()
            .entry(doc_id.to_string())
            .or_default();
        stored.extend(fields);
        Ok(())
    }

    async fn list_documents(&self, user_id: &str) -> Result<Vec<RemoteDocument>, RemoteError> {
        self.check_online()?;
        Ok(self
            .lock()?
            .get(&collection_path(user_id))
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| RemoteDocument {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_document(&self, user_id: &str, doc_id: &str) -> Result<(), RemoteError> {
        self.check_online()?;
        match self
            .lock()?
            .get_mut(&collection_path(user_id))
            .and_then(|docs| docs.remove(doc_id))
        {
            Some(_) => Ok(()),
            None => Err(RemoteError::NotFound(doc_id.to_string())),
        }
    }
}
