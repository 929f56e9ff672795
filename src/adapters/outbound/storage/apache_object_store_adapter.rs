use async_trait::async_trait;
use object_store::{
    buffered::BufWriter, path::Path as ObjectPath, Attribute, Attributes,
    ObjectStore as ApacheObjectStore, PutOptions as ApachePutOptions, PutPayload,
};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use crate::{
    adapters::outbound::storage::error::{list_error, put_error, streamed_put_error},
    domain::{
        errors::{StorageError, StorageResult},
        models::RemoteObjectIndex,
        value_objects::{BucketName, KeyPrefix, ObjectKey},
    },
    ports::storage::{ObjectStore, PutOptions, UploadBody, LIST_PAGE_SIZE},
};

/// Adapter that implements our ObjectStore port using Apache object_store.
/// Works with any backend: AmazonS3 in production, InMemory in tests.
pub struct ApacheObjectStoreAdapter {
    inner: Arc<dyn ApacheObjectStore>,
    bucket: BucketName,
}

impl ApacheObjectStoreAdapter {
    pub fn new(store: Arc<dyn ApacheObjectStore>, bucket: BucketName) -> Self {
        Self {
            inner: store,
            bucket,
        }
    }

    pub fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    fn to_object_path(key: &ObjectKey) -> StorageResult<ObjectPath> {
        ObjectPath::parse(key.as_str()).map_err(|e| StorageError::InvalidKey {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    fn to_attributes(options: &PutOptions) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(content_type) = &options.content_type {
            attributes.insert(Attribute::ContentType, content_type.clone().into());
        }
        if let Some(encoding) = &options.content_encoding {
            attributes.insert(Attribute::ContentEncoding, encoding.clone().into());
        }
        if let Some(class) = &options.storage_class {
            attributes.insert(Attribute::StorageClass, class.clone().into());
        }
        attributes
    }

    async fn stream_file(
        &self,
        key: &ObjectKey,
        location: ObjectPath,
        file: &std::path::Path,
        attributes: Attributes,
    ) -> StorageResult<()> {
        let mut source = tokio::fs::File::open(file)
            .await
            .map_err(|e| StorageError::LocalIo {
                path: file.display().to_string(),
                message: e.to_string(),
            })?;

        let mut writer = BufWriter::new(self.inner.clone(), location).with_attributes(attributes);

        if let Err(e) = tokio::io::copy(&mut source, &mut writer).await {
            // Best effort: the upload already failed
            let _ = writer.abort().await;
            return Err(streamed_put_error(key, e));
        }

        writer
            .shutdown()
            .await
            .map_err(|e| streamed_put_error(key, e))
    }
}

#[async_trait]
impl ObjectStore for ApacheObjectStoreAdapter {
    async fn list_shallow(&self, prefix: &KeyPrefix) -> StorageResult<RemoteObjectIndex> {
        let prefix_path = if prefix.is_root() {
            None
        } else {
            Some(
                ObjectPath::parse(prefix.as_str().trim_end_matches('/')).map_err(|e| {
                    StorageError::InvalidKey {
                        key: prefix.to_string(),
                        message: e.to_string(),
                    }
                })?,
            )
        };

        let listing = self
            .inner
            .list_with_delimiter(prefix_path.as_ref())
            .await
            .map_err(|e| list_error(prefix.as_str(), e))?;

        Ok(listing
            .objects
            .into_iter()
            .take(LIST_PAGE_SIZE)
            .map(|meta| (meta.location.to_string(), meta.last_modified))
            .collect())
    }

    async fn put(
        &self,
        key: &ObjectKey,
        body: UploadBody,
        options: PutOptions,
    ) -> StorageResult<String> {
        let location = Self::to_object_path(key)?;
        let attributes = Self::to_attributes(&options);

        match body {
            UploadBody::Buffered(bytes) => {
                let opts = ApachePutOptions {
                    attributes,
                    ..Default::default()
                };
                self.inner
                    .put_opts(&location, PutPayload::from(bytes), opts)
                    .await
                    .map_err(|e| put_error(key, e))?;
            }
            UploadBody::File(path) => {
                self.stream_file(key, location, &path, attributes).await?;
            }
        }

        Ok(self.bucket.url_for(key.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use object_store::memory::InMemory;

    fn adapter() -> (Arc<InMemory>, ApacheObjectStoreAdapter) {
        let store = Arc::new(InMemory::new());
        let bucket = BucketName::new("test-bucket".to_string()).unwrap();
        (store.clone(), ApacheObjectStoreAdapter::new(store, bucket))
    }

    fn key(value: &str) -> ObjectKey {
        ObjectKey::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_put_returns_s3_url() {
        let (_, adapter) = adapter();

        let url = adapter
            .put(
                &key("backups/a.txt"),
                UploadBody::Buffered(Bytes::from("hello")),
                PutOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(url, "s3://test-bucket/backups/a.txt");
    }

    #[tokio::test]
    async fn test_list_shallow_ignores_nested_objects() {
        let (store, adapter) = adapter();
        for path in ["backups/a.txt", "backups/b.txt", "backups/sub/c.txt", "other/d.txt"] {
            store
                .put(&ObjectPath::from(path), PutPayload::from(Bytes::from("x")))
                .await
                .unwrap();
        }

        let index = adapter
            .list_shallow(&KeyPrefix::new("backups/").unwrap())
            .await
            .unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.last_modified("backups/a.txt").is_some());
        assert!(index.last_modified("backups/b.txt").is_some());
        assert!(index.last_modified("backups/sub/c.txt").is_none());
    }

    #[tokio::test]
    async fn test_list_shallow_at_bucket_root() {
        let (store, adapter) = adapter();
        store
            .put(&ObjectPath::from("top.txt"), PutPayload::from(Bytes::from("x")))
            .await
            .unwrap();
        store
            .put(&ObjectPath::from("nested/n.txt"), PutPayload::from(Bytes::from("x")))
            .await
            .unwrap();

        let index = adapter.list_shallow(&KeyPrefix::root()).await.unwrap();

        assert_eq!(index.len(), 1);
        assert!(index.last_modified("top.txt").is_some());
    }

    #[tokio::test]
    async fn test_list_shallow_caps_at_page_size() {
        let (store, adapter) = adapter();
        for i in 0..(LIST_PAGE_SIZE + 5) {
            store
                .put(
                    &ObjectPath::from(format!("many/{:05}.txt", i)),
                    PutPayload::from(Bytes::from("x")),
                )
                .await
                .unwrap();
        }

        let index = adapter
            .list_shallow(&KeyPrefix::new("many").unwrap())
            .await
            .unwrap();

        assert_eq!(index.len(), LIST_PAGE_SIZE);
    }

    #[tokio::test]
    async fn test_streamed_file_upload_keeps_content_and_attributes() {
        let (store, adapter) = adapter();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("raw.bin");
        std::fs::write(&file, b"raw file content").unwrap();

        adapter
            .put(
                &key("backups/raw.bin"),
                UploadBody::File(file),
                PutOptions {
                    storage_class: Some("STANDARD_IA".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = store.get(&ObjectPath::from("backups/raw.bin")).await.unwrap();
        let attributes = result.attributes.clone();
        let content = result.bytes().await.unwrap();

        assert_eq!(content.as_ref(), b"raw file content");
        assert!(attributes.get(&Attribute::ContentEncoding).is_none());
        let class: Option<&str> = attributes.get(&Attribute::StorageClass).map(|v| v.as_ref());
        assert_eq!(class, Some("STANDARD_IA"));
    }

    #[tokio::test]
    async fn test_missing_local_file_is_reported() {
        let (_, adapter) = adapter();

        let err = adapter
            .put(
                &key("backups/missing.txt"),
                UploadBody::File("/definitely/not/here.txt".into()),
                PutOptions::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::LocalIo { .. }));
    }
}
