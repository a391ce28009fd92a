use log::debug;
use sea_orm::{ActiveValue, IntoActiveModel};
use uuid::Uuid;

use super::report::{IssueKind, PhaseReport, SyncPhase};
use super::SyncService;
use crate::entities::inventory_item;
use crate::remote::{ProductDocument, RemoteDocument};
use crate::repositories::InventoryRepository;
use crate::storage::StoreChange;
use crate::utils::datetime;

enum DownloadOutcome {
    Inserted,
    Overwritten,
    Linked,
    KeptLocal,
}

impl SyncService {
    /// Pull every remote document of `user_id` into local storage.
    pub(super) async fn download_phase(&self, user_id: &str) -> PhaseReport {
        let mut report = PhaseReport::new(SyncPhase::Download);

        let documents = match self.remote.list_documents(user_id).await {
            Ok(documents) => documents,
            Err(e) => {
                report.fail(IssueKind::Transport, format!("Failed to list remote documents: {e}"));
                return report;
            }
        };
        debug!("{} remote document(s) to reconcile", documents.len());

        for document in &documents {
            let product = match ProductDocument::from_fields(&document.fields) {
                Ok(product) => product,
                Err(e) => {
                    report.issue(Some(document.id.clone()), IssueKind::Parse, e.to_string());
                    continue;
                }
            };

            match self.apply_remote(user_id, document, &product).await {
                Ok(DownloadOutcome::Inserted) => report.created += 1,
                Ok(DownloadOutcome::Overwritten) | Ok(DownloadOutcome::Linked) => report.updated += 1,
                Ok(DownloadOutcome::KeptLocal) => report.unchanged += 1,
                Err(e) => report.issue(Some(document.id.clone()), IssueKind::LocalStore, e.to_string()),
            }
        }

        report
    }

    async fn apply_remote(
        &self,
        user_id: &str,
        document: &RemoteDocument,
        product: &ProductDocument,
    ) -> anyhow::Result<DownloadOutcome> {
        let storage = self.storage.lock().await;
        let now = datetime::now_millis();

        let Some(local) = InventoryRepository::get_by_remote_id(&storage.conn, &document.id).await? else {
            // Uploaded earlier, but recording the remote id failed locally
            if let Some(orphan) =
                InventoryRepository::find_unlinked(&storage.conn, user_id, &product.name, product.created_at).await?
            {
                let uuid = orphan.uuid;
                let mut active = orphan.into_active_model();
                active.remote_id = ActiveValue::Set(Some(document.id.clone()));
                active.last_synced = ActiveValue::Set(product.last_synced);
                InventoryRepository::update(&storage.conn, active).await?;
                storage.notify(StoreChange::ItemUpserted(uuid));
                debug!("Linked {} to remote document {}", uuid, document.id);
                return Ok(DownloadOutcome::Linked);
            }

            let created_at = if product.created_at > 0 { product.created_at } else { now };
            let model = inventory_item::ActiveModel {
                uuid: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(user_id.to_string()),
                barcode: ActiveValue::Set(product.barcode.clone()),
                name: ActiveValue::Set(product.name.clone()),
                category: ActiveValue::Set(product.category.clone()),
                expiration_date: ActiveValue::Set(product.expiration_date.clone()),
                quantity: ActiveValue::Set(product.quantity),
                unit: ActiveValue::Set(product.unit.clone()),
                image_url: ActiveValue::Set(product.image_url.clone()),
                is_my_product: ActiveValue::Set(product.is_my_product),
                created_at: ActiveValue::Set(created_at),
                updated_at: ActiveValue::Set(now),
                is_dirty: ActiveValue::Set(false),
                remote_id: ActiveValue::Set(Some(document.id.clone())),
                last_synced: ActiveValue::Set(product.last_synced),
                is_deleted: ActiveValue::Set(product.is_deleted),
            };
            let created = InventoryRepository::insert(&storage.conn, model).await?;
            storage.notify(StoreChange::ItemUpserted(created.uuid));
            debug!("Inserted {} from remote document {}", created.uuid, document.id);
            return Ok(DownloadOutcome::Inserted);
        };

        // Last write wins; on equal stamps the local record is kept
        let local_stamp = local.last_synced.unwrap_or(0);
        if product.sync_stamp() <= local_stamp {
            return Ok(DownloadOutcome::KeptLocal);
        }

        let uuid = local.uuid;
        let locally_deleted = local.is_deleted;
        let mut active = local.into_active_model();
        active.barcode = ActiveValue::Set(product.barcode.clone());
        active.name = ActiveValue::Set(product.name.clone());
        active.category = ActiveValue::Set(product.category.clone());
        active.expiration_date = ActiveValue::Set(product.expiration_date.clone());
        active.quantity = ActiveValue::Set(product.quantity);
        active.unit = ActiveValue::Set(product.unit.clone());
        active.image_url = ActiveValue::Set(product.image_url.clone());
        active.is_my_product = ActiveValue::Set(product.is_my_product);
        // A pending local delete is never resurrected by a remote update
        active.is_deleted = ActiveValue::Set(locally_deleted || product.is_deleted);
        active.is_dirty = ActiveValue::Set(false);
        active.last_synced = ActiveValue::Set(product.last_synced);
        active.updated_at = ActiveValue::Set(now);
        InventoryRepository::update(&storage.conn, active).await?;
        storage.notify(StoreChange::ItemUpserted(uuid));
        debug!("Overwrote {} with newer remote document {}", uuid, document.id);

        Ok(DownloadOutcome::Overwritten)
    }
}
