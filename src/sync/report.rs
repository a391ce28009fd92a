//! Structured results of a reconciliation run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which phase of reconciliation produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncPhase {
    Upload,
    Download,
    Cleanup,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Upload => "upload",
            SyncPhase::Download => "download",
            SyncPhase::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Classification of reconciliation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    /// A remote call failed.
    Transport,
    /// A remote document did not map to a local record.
    Parse,
    /// The local database rejected a read or write.
    LocalStore,
}

/// One failure, scoped to a record when it concerns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncIssue {
    pub phase: SyncPhase,
    /// Local uuid or remote document id of the affected record.
    pub record: Option<String>,
    pub kind: IssueKind,
    pub message: String,
}

impl fmt::Display for SyncIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.record {
            Some(record) => write!(f, "[{}] {:?} on {}: {}", self.phase, self.kind, record, self.message),
            None => write!(f, "[{}] {:?}: {}", self.phase, self.kind, self.message),
        }
    }
}

/// Outcome of a single phase.
///
/// Counter meaning depends on the phase: for upload `created`/`updated` are
/// remote creates and merge-writes; for download they are local inserts and
/// overwrites, with `unchanged` counting records where local won; for cleanup
/// `removed` counts purged records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    pub phase: SyncPhase,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub removed: usize,
    /// Per-record failures; the phase carried on past each of them.
    pub issues: Vec<SyncIssue>,
    /// Set when the phase could not run at all (e.g. listing failed).
    pub failure: Option<SyncIssue>,
}

impl PhaseReport {
    pub fn new(phase: SyncPhase) -> Self {
        Self {
            phase,
            created: 0,
            updated: 0,
            unchanged: 0,
            removed: 0,
            issues: Vec::new(),
            failure: None,
        }
    }

    pub(crate) fn issue(&mut self, record: Option<String>, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(SyncIssue {
            phase: self.phase,
            record,
            kind,
            message: message.into(),
        });
    }

    pub(crate) fn fail(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.failure = Some(SyncIssue {
            phase: self.phase,
            record: None,
            kind,
            message: message.into(),
        });
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none() && self.issues.is_empty()
    }

    /// Number of records this phase changed, locally or remotely.
    pub fn changes(&self) -> usize {
        self.created + self.updated + self.removed
    }
}

/// Aggregated result of one `reconcile` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub user_id: String,
    pub started_at: i64,
    pub finished_at: i64,
    pub upload: PhaseReport,
    pub download: PhaseReport,
    pub cleanup: PhaseReport,
}

impl SyncReport {
    pub fn phases(&self) -> [&PhaseReport; 3] {
        [&self.upload, &self.download, &self.cleanup]
    }

    pub fn is_success(&self) -> bool {
        self.phases().iter().all(|p| p.is_success())
    }

    /// Every issue and phase failure, in phase order.
    pub fn issues(&self) -> Vec<&SyncIssue> {
        self.phases()
            .into_iter()
            .flat_map(|p| p.failure.iter().chain(p.issues.iter()))
            .collect()
    }

    pub fn changes(&self) -> usize {
        self.phases().iter().map(|p| p.changes()).sum()
    }

    /// One-line summary suitable for a status bar.
    pub fn summary(&self) -> String {
        format!(
            "uploaded {} new / {} updated, downloaded {} new / {} updated, purged {}, {} issue(s)",
            self.upload.created,
            self.upload.updated,
            self.download.created,
            self.download.updated,
            self.cleanup.removed,
            self.issues().len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SyncReport {
        SyncReport {
            user_id: "u1".to_string(),
            started_at: 0,
            finished_at: 1,
            upload: PhaseReport::new(SyncPhase::Upload),
            download: PhaseReport::new(SyncPhase::Download),
            cleanup: PhaseReport::new(SyncPhase::Cleanup),
        }
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = report();
        assert!(report.is_success());
        assert_eq!(report.changes(), 0);
        assert!(report.issues().is_empty());
    }

    #[test]
    fn test_issues_in_phase_order() {
        let mut report = report();
        report.cleanup.issue(Some("c1".to_string()), IssueKind::Transport, "offline");
        report.download.fail(IssueKind::Transport, "list failed");
        report.upload.issue(Some("a1".to_string()), IssueKind::LocalStore, "locked");
        report.upload.created = 2;
        report.cleanup.removed = 1;

        let phases: Vec<SyncPhase> = report.issues().iter().map(|i| i.phase).collect();
        assert_eq!(phases, vec![SyncPhase::Upload, SyncPhase::Download, SyncPhase::Cleanup]);
        assert!(!report.is_success());
        assert_eq!(report.changes(), 3);
        assert!(report.summary().ends_with("3 issue(s)"));
    }

    #[test]
    fn test_issue_display() {
        let mut phase = PhaseReport::new(SyncPhase::Download);
        phase.issue(Some("doc1".to_string()), IssueKind::Parse, "bad date");
        assert_eq!(phase.issues[0].to_string(), "[download] Parse on doc1: bad date");
    }
}
