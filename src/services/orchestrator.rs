use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::{
    domain::{
        errors::{PartitionError, SyncError},
        models::{BackupFolderDeclaration, BackupUnit, RunSummary},
    },
    ports::{services::BackupService, SyncEvent, SyncObserver},
    services::{
        partitioner::{ensure_disjoint, DirectoryPartitioner},
        reconciler::Reconciler,
    },
};

/// Fans out one reconciliation task per backup unit and joins them all
#[derive(Clone)]
pub struct SyncOrchestrator {
    partitioner: DirectoryPartitioner,
    reconciler: Arc<Reconciler>,
    observer: Arc<dyn SyncObserver>,
    max_concurrent_units: Option<NonZeroUsize>,
}

impl SyncOrchestrator {
    pub fn new(
        partitioner: DirectoryPartitioner,
        reconciler: Reconciler,
        observer: Arc<dyn SyncObserver>,
    ) -> Self {
        Self {
            partitioner,
            reconciler: Arc::new(reconciler),
            observer,
            max_concurrent_units: None,
        }
    }

    /// Cap the number of units reconciled at the same time. `None` (the
    /// default) starts every unit at once.
    pub fn with_max_concurrent_units(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.max_concurrent_units = limit;
        self
    }

    /// Partition every declaration. Invalid declarations abort the run; a
    /// declaration whose walk fails is skipped and recorded in `summary`.
    pub async fn plan(
        &self,
        declarations: &[BackupFolderDeclaration],
        summary: &mut RunSummary,
    ) -> Result<Vec<BackupUnit>, SyncError> {
        if declarations.is_empty() {
            return Err(SyncError::NoFolders);
        }

        for (index, declaration) in declarations.iter().enumerate() {
            DirectoryPartitioner::validate(declaration)
                .map_err(|source| SyncError::InvalidDeclaration { index, source })?;
        }

        let mut units = Vec::new();
        for (index, declaration) in declarations.iter().enumerate() {
            let partitioner = self.partitioner.clone();
            let owned = declaration.clone();
            let partitioned = tokio::task::spawn_blocking(move || partitioner.partition(&owned))
                .await
                .unwrap_or_else(|e| {
                    Err(PartitionError::Aborted {
                        root: declaration.source_path.clone(),
                        message: e.to_string(),
                    })
                });

            match partitioned {
                Ok(mut declared) => units.append(&mut declared),
                Err(e) if e.is_fatal() => {
                    return Err(SyncError::InvalidDeclaration { index, source: e });
                }
                Err(e) => {
                    self.observer.on_event(SyncEvent::PartitionFailed {
                        root: declaration.source_path.clone(),
                        error: e.to_string(),
                    });
                    summary.failed_declarations.push(declaration.source_path.clone());
                }
            }
        }

        ensure_disjoint(&units)?;
        Ok(units)
    }

    /// Reconcile every unit concurrently and wait for all of them
    pub async fn execute(&self, units: Vec<BackupUnit>, summary: &mut RunSummary) {
        let limiter = self
            .max_concurrent_units
            .map(|limit| Arc::new(Semaphore::new(limit.get())));

        let mut tasks = JoinSet::new();
        for unit in units {
            let reconciler = self.reconciler.clone();
            let limiter = limiter.clone();
            tasks.spawn(async move {
                let _permit = match &limiter {
                    Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
                    None => None,
                };
                reconciler.reconcile(&unit).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => summary.absorb(&report),
                Err(e) => {
                    summary.failed_units += 1;
                    self.observer.on_event(SyncEvent::UnitAborted {
                        error: e.to_string(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl BackupService for SyncOrchestrator {
    async fn run(&self, declarations: &[BackupFolderDeclaration]) -> Result<RunSummary, SyncError> {
        let mut summary = RunSummary::default();
        let units = self.plan(declarations, &mut summary).await?;

        summary.units = units.len();
        self.observer.on_event(SyncEvent::RunStarted {
            declarations: declarations.len(),
            units: units.len(),
        });

        self.execute(units, &mut summary).await;

        self.observer.on_event(SyncEvent::RunFinished {
            summary: summary.clone(),
        });
        Ok(summary)
    }
}
