use std::path::PathBuf;

use crate::domain::{
    errors::StorageResult,
    models::RemoteObjectIndex,
    value_objects::{KeyPrefix, ObjectKey},
};
use async_trait::async_trait;
use bytes::Bytes;

/// Maximum number of entries a shallow listing returns.
///
/// Objects past this cap are invisible to reconciliation and get re-uploaded
/// on every run. Follow-up pages are never requested.
pub const LIST_PAGE_SIZE: usize = 1000;

/// Port for the two bucket operations the sync engine needs.
/// Adapters are bound to a single bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// List objects directly under `prefix` (delimiter `/`, no recursion),
    /// capped at [`LIST_PAGE_SIZE`] entries
    async fn list_shallow(&self, prefix: &KeyPrefix) -> StorageResult<RemoteObjectIndex>;

    /// Upload one object and return its `s3://bucket/key` URL
    async fn put(&self, key: &ObjectKey, body: UploadBody, options: PutOptions)
        -> StorageResult<String>;
}

/// Content of an upload
#[derive(Debug, Clone)]
pub enum UploadBody {
    /// Fully buffered content (the gzip path)
    Buffered(Bytes),
    /// A local file streamed from disk as-is
    File(PathBuf),
}

/// Object attributes sent with an upload; `None` leaves the header unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub storage_class: Option<String>,
}
