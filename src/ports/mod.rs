pub mod observer;
pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use observer::{SyncEvent, SyncObserver};
pub use services::BackupService;
pub use storage::{ObjectStore, PutOptions, UploadBody, LIST_PAGE_SIZE};
