use log::debug;

use super::report::{IssueKind, PhaseReport, SyncPhase};
use super::SyncService;
use crate::entities::inventory_item;
use crate::remote::ProductDocument;
use crate::repositories::InventoryRepository;
use crate::storage::StoreChange;
use crate::utils::datetime;

enum UploadOutcome {
    Created,
    Merged,
}

impl SyncService {
    /// Push every dirty, non-deleted record of `user_id`.
    pub(super) async fn upload_phase(&self, user_id: &str) -> PhaseReport {
        let mut report = PhaseReport::new(SyncPhase::Upload);

        let dirty = {
            let storage = self.storage.lock().await;
            InventoryRepository::get_dirty_for_user(&storage.conn, user_id).await
        };
        let dirty = match dirty {
            Ok(items) => items,
            Err(e) => {
                report.fail(IssueKind::LocalStore, format!("Failed to load dirty items: {e}"));
                return report;
            }
        };
        debug!("{} dirty item(s) to upload", dirty.len());

        for item in dirty {
            match self.upload_item(user_id, &item).await {
                Ok(UploadOutcome::Created) => report.created += 1,
                Ok(UploadOutcome::Merged) => report.updated += 1,
                Err((kind, message)) => report.issue(Some(item.uuid.to_string()), kind, message),
            }
        }

        report
    }

    async fn upload_item(
        &self,
        user_id: &str,
        item: &inventory_item::Model,
    ) -> Result<UploadOutcome, (IssueKind, String)> {
        let synced_at = datetime::now_millis();
        let fields = ProductDocument::from_item(item, synced_at)
            .to_fields()
            .map_err(|e| (IssueKind::Parse, e.to_string()))?;

        // The storage lock is not held during remote calls
        let (remote_id, outcome) = match &item.remote_id {
            None => {
                let id = self
                    .remote
                    .create_document(user_id, fields)
                    .await
                    .map_err(|e| (IssueKind::Transport, format!("Failed to create remote document: {e}")))?;
                (id, UploadOutcome::Created)
            }
            Some(id) => {
                self.remote
                    .merge_document(user_id, id, fields)
                    .await
                    .map_err(|e| (IssueKind::Transport, format!("Failed to update remote document {id}: {e}")))?;
                (id.clone(), UploadOutcome::Merged)
            }
        };

        let storage = self.storage.lock().await;
        let cleared = InventoryRepository::mark_synced(&storage.conn, &item.uuid, &remote_id, synced_at, item.updated_at)
            .await
            .map_err(|e| (IssueKind::LocalStore, format!("Uploaded as {remote_id} but failed to mark synced: {e}")))?;
        if !cleared {
            debug!("Item {} changed during upload, keeping it dirty", item.uuid);
        }
        storage.notify(StoreChange::ItemUpserted(item.uuid));

        Ok(outcome)
    }
}
