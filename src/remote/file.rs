//! Directory-backed remote store.
//!
//! Mirrors the collection layout on disk, one JSON file per document:
//! `<root>/user_products/<user_id>/products/<doc_id>.json`.

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::{collection_path, DocumentFields, RemoteDocument, RemoteError, RemoteStore};

pub struct FileRemoteStore {
    root: PathBuf,
}

impl FileRemoteStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, user_id: &str) -> Result<PathBuf, RemoteError> {
        validate_segment(user_id)?;
        Ok(self.root.join(collection_path(user_id)))
    }

    fn document_path(&self, user_id: &str, doc_id: &str) -> Result<PathBuf, RemoteError> {
        validate_segment(doc_id)?;
        Ok(self.collection_dir(user_id)?.join(format!("{}.json", doc_id)))
    }

    async fn write_fields(&self, path: &Path, fields: &DocumentFields) -> Result<(), RemoteError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        let body =
            serde_json::to_vec_pretty(fields).map_err(|e| RemoteError::InvalidData(e.to_string()))?;
        tokio::fs::write(path, body).await.map_err(io_error)
    }

    async fn read_fields(&self, path: &Path) -> Result<Option<DocumentFields>, RemoteError> {
        let body = match tokio::fs::read(path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(e)),
        };
        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(_) => Err(RemoteError::InvalidData(format!("{} is not a JSON object", path.display()))),
            Err(e) => Err(RemoteError::InvalidData(format!("{}: {}", path.display(), e))),
        }
    }
}

/// Reject ids that would escape the collection directory.
fn validate_segment(segment: &str) -> Result<(), RemoteError> {
    if segment.is_empty() || segment.contains(['/', '\\']) || segment == "." || segment == ".." {
        return Err(RemoteError::InvalidData(format!("invalid path segment '{}'", segment)));
    }
    Ok(())
}

fn io_error(e: std::io::Error) -> RemoteError {
    match e.kind() {
        ErrorKind::PermissionDenied => RemoteError::PermissionDenied(e.to_string()),
        ErrorKind::NotFound => RemoteError::NotFound(e.to_string()),
        _ => RemoteError::Network(e.to_string()),
    }
}

#[async_trait]
impl RemoteStore for FileRemoteStore {
    fn store_type(&self) -> &str {
        "file"
    }

    async fn create_document(&self, user_id: &str, fields: DocumentFields) -> Result<String, RemoteError> {
        let doc_id = Uuid::new_v4().simple().to_string();
        let path = self.document_path(user_id, &doc_id)?;
        self.write_fields(&path, &fields).await?;
        debug!("Created remote document {}", path.display());
        Ok(doc_id)
    }

    async fn merge_document(&self, user_id: &str, doc_id: &str, fields: DocumentFields) -> Result<(), RemoteError> {
        let path = self.document_path(user_id, doc_id)?;
        let mut stored = self.read_fields(&path).await?.unwrap_or_default();
        stored.extend(fields);
        self.write_fields(&path, &stored).await
    }

    /// A file that is not a JSON object is listed with empty fields instead of
    /// failing the whole listing.
    async fn list_documents(&self, user_id: &str) -> Result<Vec<RemoteDocument>, RemoteError> {
        let dir = self.collection_dir(user_id)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(e)),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string) else {
                continue;
            };
            match self.read_fields(&path).await {
                Ok(Some(fields)) => documents.push(RemoteDocument { id, fields }),
                Ok(None) => {}
                // Listed with no fields so the caller reports it per document
                Err(RemoteError::InvalidData(reason)) => {
                    warn!("⚠️  Unreadable remote document {}: {}", id, reason);
                    documents.push(RemoteDocument {
                        id,
                        fields: DocumentFields::new(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(documents)
    }

    async fn delete_document(&self, user_id: &str, doc_id: &str) -> Result<(), RemoteError> {
        let path = self.document_path(user_id, doc_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(RemoteError::NotFound(doc_id.to_string())),
            Err(e) => Err(io_error(e)),
        }
    }
}
