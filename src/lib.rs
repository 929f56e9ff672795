pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    // Models
    BackupFolderDeclaration,
    BackupUnit,
    // Value objects
    BucketName,
    DomainValidationError,
    KeyPrefix,
    ObjectKey,
    // Errors
    PartitionError,
    RemoteObjectIndex,
    RunSummary,
    StorageError,
    SyncError,
    UnitReport,
    UploadError,
    UploadOutcome,
};

// Port types - interfaces for external systems
pub use ports::{BackupService, ObjectStore, PutOptions, SyncEvent, SyncObserver, UploadBody};

// Service implementations - business logic
pub use services::{
    DirectoryPartitioner, ExclusionMatcher, ReconcileSettings, Reconciler, SyncOrchestrator,
};

// Configuration
pub use config::{BackupConfig, ConfigError};

// Application factory and configuration
pub use app::{
    create_app_from_config, create_in_memory_app, AppBuilder, AppConfig, AppDependencies,
    AppError, AppServices, StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{
    observer::{RecordingObserver, TracingObserver},
    storage::ApacheObjectStoreAdapter,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, ApacheObjectStoreAdapter, AppBuilder, AppServices, BackupConfig,
        BackupFolderDeclaration, BackupService, BucketName, KeyPrefix, ObjectKey, ObjectStore,
        RunSummary, SyncObserver, SyncOrchestrator, TracingObserver,
    };
}
