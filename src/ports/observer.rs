use std::path::PathBuf;

use crate::domain::models::{RunSummary, UnitReport};

/// Something worth telling the operator about while a sync runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    RunStarted {
        declarations: usize,
        units: usize,
    },
    RunFinished {
        summary: RunSummary,
    },
    DirectoryExcluded {
        path: String,
        pattern: String,
    },
    DirectorySkipped {
        path: PathBuf,
        error: String,
    },
    PartitionFailed {
        root: PathBuf,
        error: String,
    },
    UnitStarted {
        source_path: PathBuf,
        destination_prefix: String,
    },
    UnitFinished {
        report: UnitReport,
    },
    ListingFailed {
        prefix: String,
        error: String,
    },
    UnitReadFailed {
        source_path: PathBuf,
        error: String,
    },
    UnitAborted {
        error: String,
    },
    FileSkipped {
        source_path: PathBuf,
        key: String,
    },
    FileUploaded {
        source_path: PathBuf,
        key: String,
        url: String,
    },
    FileFailed {
        source_path: PathBuf,
        key: String,
        error: String,
    },
}

/// Port receiving sync events. Injected into the orchestrator and the
/// reconciler instead of a process-wide logger.
pub trait SyncObserver: Send + Sync + 'static {
    fn on_event(&self, event: SyncEvent);
}
