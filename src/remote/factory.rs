//! Remote store factory for creating store instances from configuration.

use anyhow::{anyhow, Result};
use std::sync::Arc;

use super::{FileRemoteStore, MemoryRemoteStore, RemoteStore};
use crate::config::RemoteConfig;

/// Create a remote store from its configuration.
///
/// # Errors
/// Returns error if the store type is unknown or a file store has no root directory.
pub fn create_remote_store(config: &RemoteConfig) -> Result<Arc<dyn RemoteStore>> {
    match config.store_type.as_str() {
        "memory" => Ok(Arc::new(MemoryRemoteStore::new())),
        "file" => {
            if config.root_dir.trim().is_empty() {
                return Err(anyhow!("File remote store requires 'root_dir'"));
            }
            Ok(Arc::new(FileRemoteStore::new(&config.root_dir)))
        }
        other => Err(anyhow!("Unknown remote store type: {}", other)),
    }
}
