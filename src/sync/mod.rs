//! Synchronization service module.
//!
//! This module provides the [`SyncService`] struct which reconciles the local
//! inventory with a user's remote document collection in three sequential
//! phases:
//! - Upload: push dirty local records (create or merge-write)
//! - Download: pull remote documents, last-write-wins on `lastSynced`
//! - Cleanup: delete soft-deleted records remotely, then locally
//!
//! A failing phase never stops the next one, and a failing record never
//! stops its batch. Everything that went wrong is collected in the returned
//! [`SyncReport`] and logged.

mod cleanup;
mod download;
pub mod report;
mod upload;

pub use report::{IssueKind, PhaseReport, SyncIssue, SyncPhase, SyncReport};

use log::{error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::constants::{LOG_SYNC_ALREADY_RUNNING, LOG_SYNC_STARTED};
use crate::remote::RemoteStore;
use crate::session::SessionService;
use crate::storage::LocalStorage;
use crate::utils::datetime;

/// Service that reconciles local storage with a remote document store.
///
/// The service is cheap to clone; clones share the storage handle, the
/// remote store and the in-progress flag, so a second `reconcile` started
/// while one is running returns [`SyncStatus::InProgress`] instead of racing
/// it over the same records.
///
/// # Example
/// ```rust,no_run
/// use pantry::remote::MemoryRemoteStore;
/// use pantry::storage::LocalStorage;
/// use pantry::sync::{SyncService, SyncStatus};
/// use std::sync::Arc;
/// use tokio::sync::Mutex;
///
/// # async fn example() -> anyhow::Result<()> {
/// let storage = Arc::new(Mutex::new(LocalStorage::in_memory().await?));
/// let sync_service = SyncService::new(storage, Arc::new(MemoryRemoteStore::new()));
///
/// if let SyncStatus::Completed(report) = sync_service.reconcile("local_1_abcd").await {
///     println!("{}", report.summary());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SyncService {
    storage: Arc<Mutex<LocalStorage>>,
    remote: Arc<dyn RemoteStore>,
    sync_in_progress: Arc<AtomicBool>,
    last_status: Arc<StdMutex<SyncStatus>>,
}

/// Represents the state of a synchronization operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    /// No reconciliation has run yet
    Idle,
    /// A reconciliation is currently running
    InProgress,
    /// The reconciliation ran to the end; inspect the report for issues
    Completed(SyncReport),
}

impl SyncService {
    pub fn new(storage: Arc<Mutex<LocalStorage>>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            storage,
            remote,
            sync_in_progress: Arc::new(AtomicBool::new(false)),
            last_status: Arc::new(StdMutex::new(SyncStatus::Idle)),
        }
    }

    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    /// Checks if a reconciliation is currently in progress.
    pub async fn is_syncing(&self) -> bool {
        self.sync_in_progress.load(Ordering::SeqCst)
    }

    /// Status of the most recent reconciliation.
    pub async fn last_status(&self) -> SyncStatus {
        match self.last_status.lock() {
            Ok(status) => status.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Runs the three reconciliation phases for `user_id`.
    ///
    /// Never fails: per-record and per-phase errors end up in the
    /// [`SyncReport`]. Returns [`SyncStatus::InProgress`] without touching any
    /// data when another reconciliation is already running.
    ///
    /// Dropping the returned future mid-run releases the in-progress flag and
    /// restores the previous status, so the next call runs normally.
    pub async fn reconcile(&self, user_id: &str) -> SyncStatus {
        let Some(guard) = ReconcileGuard::acquire(&self.sync_in_progress, &self.last_status) else {
            info!("{}", LOG_SYNC_ALREADY_RUNNING);
            return SyncStatus::InProgress;
        };

        let report = self.perform_reconcile(user_id).await;
        let status = SyncStatus::Completed(report);
        guard.finish(status.clone());

        status
    }

    async fn perform_reconcile(&self, user_id: &str) -> SyncReport {
        info!("{} for {} via {} store", LOG_SYNC_STARTED, user_id, self.remote.store_type());
        let started_at = datetime::now_millis();

        let upload = self.upload_phase(user_id).await;
        log_phase(&upload);
        let download = self.download_phase(user_id).await;
        log_phase(&download);
        let cleanup = self.cleanup_phase(user_id).await;
        log_phase(&cleanup);

        let report = SyncReport {
            user_id: user_id.to_string(),
            started_at,
            finished_at: datetime::now_millis(),
            upload,
            download,
            cleanup,
        };
        if report.is_success() {
            info!("✅ Reconciliation finished: {}", report.summary());
        } else {
            warn!("⚠️  Reconciliation finished with issues: {}", report.summary());
        }
        report
    }

    /// Reconcile every `interval`, resolving the user through `session` each
    /// time. Returns `None` when `interval` is zero (manual sync only).
    pub fn spawn_auto_sync(&self, session: SessionService, interval: Duration) -> Option<JoinHandle<()>> {
        if interval.is_zero() {
            return None;
        }

        let service = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                match session.resolve_user_id().await {
                    Ok(user_id) => {
                        service.reconcile(&user_id).await;
                    }
                    Err(e) => error!("❌ Auto-sync could not resolve user: {e}"),
                }
            }
        }))
    }
}

/// Holds the in-progress flag for one reconciliation and clears it on drop.
struct ReconcileGuard {
    flag: Arc<AtomicBool>,
    status: Arc<StdMutex<SyncStatus>>,
    /// Status to restore if the run is abandoned before `finish`
    previous: Option<SyncStatus>,
}

impl ReconcileGuard {
    fn acquire(flag: &Arc<AtomicBool>, status: &Arc<StdMutex<SyncStatus>>) -> Option<Self> {
        if flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            return None;
        }
        let mut guard = Self {
            flag: flag.clone(),
            status: status.clone(),
            previous: None,
        };
        guard.previous = Some(guard.replace_status(SyncStatus::InProgress));
        Some(guard)
    }

    fn finish(mut self, status: SyncStatus) {
        self.previous = None;
        self.replace_status(status);
    }

    fn replace_status(&self, status: SyncStatus) -> SyncStatus {
        let mut current = match self.status.lock() {
            Ok(current) => current,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *current, status)
    }
}

impl Drop for ReconcileGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            warn!("⚠️  Reconciliation abandoned before completion");
            self.replace_status(previous);
        }
        self.flag.store(false, Ordering::SeqCst);
    }
}

fn log_phase(report: &PhaseReport) {
    if let Some(failure) = &report.failure {
        error!("❌ {}", failure);
    }
    for issue in &report.issues {
        warn!("⚠️  {}", issue);
    }
    info!(
        "Phase {}: {} created, {} updated, {} unchanged, {} removed",
        report.phase, report.created, report.updated, report.unchanged, report.removed
    );
}
