use crate::domain::{errors::SyncError, models::{BackupFolderDeclaration, RunSummary}};
use async_trait::async_trait;

/// Port for running a backup of a set of declared folders
#[async_trait]
pub trait BackupService: Send + Sync + 'static {
    /// Partition every declaration, reconcile every unit concurrently and
    /// wait for all of them. Per-file and per-unit failures are reported in
    /// the summary; only configuration problems return an error.
    async fn run(&self, declarations: &[BackupFolderDeclaration]) -> Result<RunSummary, SyncError>;
}
