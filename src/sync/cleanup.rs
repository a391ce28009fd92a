use log::debug;

use super::report::{IssueKind, PhaseReport, SyncPhase};
use super::SyncService;
use crate::remote::RemoteError;
use crate::repositories::InventoryRepository;
use crate::storage::StoreChange;

impl SyncService {
    /// Delete soft-deleted records remotely, then purge them locally.
    pub(super) async fn cleanup_phase(&self, user_id: &str) -> PhaseReport {
        let mut report = PhaseReport::new(SyncPhase::Cleanup);

        let deleted = {
            let storage = self.storage.lock().await;
            InventoryRepository::get_deleted_for_user(&storage.conn, user_id).await
        };
        let deleted = match deleted {
            Ok(items) => items,
            Err(e) => {
                report.fail(IssueKind::LocalStore, format!("Failed to load deleted items: {e}"));
                return report;
            }
        };

        for item in deleted {
            let record = Some(item.uuid.to_string());

            if let Some(remote_id) = &item.remote_id {
                match self.remote.delete_document(user_id, remote_id).await {
                    Ok(()) => {}
                    // Already gone remotely; nothing left to confirm
                    Err(RemoteError::NotFound(_)) => debug!("Remote document {remote_id} already deleted"),
                    Err(e) => {
                        // Keep the local record so the next run retries
                        report.issue(record, IssueKind::Transport, format!("Failed to delete remote document {remote_id}: {e}"));
                        continue;
                    }
                }
            }

            let uuid = item.uuid;
            let storage = self.storage.lock().await;
            match InventoryRepository::delete(&storage.conn, item).await {
                Ok(()) => {
                    storage.notify(StoreChange::ItemRemoved(uuid));
                    report.removed += 1;
                }
                Err(e) => report.issue(record, IssueKind::LocalStore, format!("Failed to purge local record: {e}")),
            }
        }

        report
    }
}
