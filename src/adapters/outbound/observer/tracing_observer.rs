use tracing::{debug, error, info, warn};

use crate::ports::{SyncEvent, SyncObserver};

/// Writes every sync event to the `tracing` subscriber of the process
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl SyncObserver for TracingObserver {
    fn on_event(&self, event: SyncEvent) {
        match event {
            SyncEvent::RunStarted {
                declarations,
                units,
            } => {
                info!(declarations, units, "Starting backup run");
            }
            SyncEvent::RunFinished { summary } => {
                if summary.has_failures() {
                    warn!(
                        units = summary.units,
                        uploaded = summary.uploaded,
                        skipped = summary.skipped,
                        failed = summary.failed,
                        failed_units = summary.failed_units,
                        failed_declarations = summary.failed_declarations.len(),
                        degraded_listings = summary.degraded_listings,
                        "Backup run finished with failures"
                    );
                } else {
                    info!(
                        units = summary.units,
                        uploaded = summary.uploaded,
                        skipped = summary.skipped,
                        "Backup run finished"
                    );
                }
            }
            SyncEvent::DirectoryExcluded { path, pattern } => {
                info!(%path, %pattern, "Excluding directory");
            }
            SyncEvent::DirectorySkipped { path, error } => {
                warn!(path = %path.display(), %error, "Skipping directory without a key form");
            }
            SyncEvent::PartitionFailed { root, error } => {
                error!(root = %root.display(), %error, "Could not walk backup folder");
            }
            SyncEvent::UnitStarted {
                source_path,
                destination_prefix,
            } => {
                debug!(
                    source = %source_path.display(),
                    prefix = %destination_prefix,
                    "Reconciling directory"
                );
            }
            SyncEvent::UnitFinished { report } => {
                debug!(
                    source = %report.source_path.display(),
                    uploaded = report.uploaded,
                    skipped = report.skipped,
                    failed = report.failed,
                    "Directory done"
                );
            }
            SyncEvent::ListingFailed { prefix, error } => {
                warn!(%prefix, %error, "Listing failed, uploading every file in the directory");
            }
            SyncEvent::UnitReadFailed { source_path, error } => {
                error!(source = %source_path.display(), %error, "Could not read directory");
            }
            SyncEvent::UnitAborted { error } => {
                error!(%error, "Directory task aborted");
            }
            SyncEvent::FileSkipped { source_path, key } => {
                debug!(source = %source_path.display(), %key, "Remote copy is current");
            }
            SyncEvent::FileUploaded {
                source_path,
                key,
                url,
            } => {
                info!(source = %source_path.display(), %key, %url, "Uploaded file");
            }
            SyncEvent::FileFailed {
                source_path,
                key,
                error,
            } => {
                error!(source = %source_path.display(), %key, %error, "Upload failed");
            }
        }
    }
}
