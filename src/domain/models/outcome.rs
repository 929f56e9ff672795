use std::path::PathBuf;

use crate::domain::errors::UploadError;
use crate::domain::value_objects::KeyPrefix;

/// Why a file was not uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The remote copy is newer than the local file
    AlreadyCurrent,
}

/// Result of reconciling one local file
#[derive(Debug)]
pub enum UploadOutcome {
    Skipped(SkipReason),
    Uploaded(String),
    Failed(UploadError),
}

/// Counters for one reconciled unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitReport {
    pub source_path: PathBuf,
    pub destination_prefix: KeyPrefix,
    pub uploaded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Remote listing failed and every file was treated as stale
    pub listing_degraded: bool,
    /// The unit directory itself could not be read
    pub read_failed: bool,
}

impl UnitReport {
    pub fn new(source_path: PathBuf, destination_prefix: KeyPrefix) -> Self {
        Self {
            source_path,
            destination_prefix,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &UploadOutcome) {
        match outcome {
            UploadOutcome::Skipped(_) => self.skipped += 1,
            UploadOutcome::Uploaded(_) => self.uploaded += 1,
            UploadOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Aggregate of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub units: usize,
    pub uploaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub degraded_listings: usize,
    /// Units whose directory could not be read or whose task panicked
    pub failed_units: usize,
    /// Declaration roots whose directory walk failed
    pub failed_declarations: Vec<PathBuf>,
}

impl RunSummary {
    pub fn absorb(&mut self, report: &UnitReport) {
        self.uploaded += report.uploaded;
        self.skipped += report.skipped;
        self.failed += report.failed;
        if report.listing_degraded {
            self.degraded_listings += 1;
        }
        if report.read_failed {
            self.failed_units += 1;
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.failed_units > 0 || !self.failed_declarations.is_empty()
    }
}
