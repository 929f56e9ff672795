use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::{
    domain::{
        errors::{UploadError, ValidationError},
        models::{BackupUnit, RemoteObjectIndex, SkipReason, UnitReport, UploadOutcome},
        value_objects::{KeyPrefix, ObjectKey},
    },
    ports::{ObjectStore, PutOptions, SyncEvent, SyncObserver, UploadBody},
    services::content::{self, GZIP_ENCODING, GZIP_SUFFIX},
};

/// Settings shared by every unit of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSettings {
    /// Prepended to every unit's destination prefix (hostname and/or configured prefix)
    pub global_prefix: KeyPrefix,
    /// Used when a unit has no storage class of its own
    pub default_storage_class: Option<String>,
}

/// Uploads the missing or stale top-level files of one [`BackupUnit`]
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn ObjectStore>,
    observer: Arc<dyn SyncObserver>,
    settings: ReconcileSettings,
}

/// What the reconciler needs to know about one local file
struct LocalFile {
    path: PathBuf,
    modified: DateTime<Utc>,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        observer: Arc<dyn SyncObserver>,
        settings: ReconcileSettings,
    ) -> Self {
        Self {
            store,
            observer,
            settings,
        }
    }

    /// Global prefix followed by the unit's own prefix
    pub fn effective_prefix(&self, unit: &BackupUnit) -> KeyPrefix {
        self.settings.global_prefix.join(&unit.destination_prefix)
    }

    /// The unit's storage class unless blank, else the configured default
    pub fn storage_class(&self, unit: &BackupUnit) -> Option<String> {
        let explicit = unit.storage_class.trim();
        if explicit.is_empty() {
            self.settings
                .default_storage_class
                .as_deref()
                .map(str::trim)
                .filter(|class| !class.is_empty())
                .map(str::to_string)
        } else {
            Some(explicit.to_string())
        }
    }

    /// Reconcile the files directly inside the unit directory. Never fails as a
    /// whole: listing errors degrade to an empty index and file errors are
    /// recorded per file.
    pub async fn reconcile(&self, unit: &BackupUnit) -> UnitReport {
        let prefix = self.effective_prefix(unit);
        let storage_class = self.storage_class(unit);
        let mut report = UnitReport::new(unit.source_path.clone(), prefix.clone());

        self.observer.on_event(SyncEvent::UnitStarted {
            source_path: unit.source_path.clone(),
            destination_prefix: prefix.to_string(),
        });

        let index = match self.store.list_shallow(&prefix).await {
            Ok(index) => index,
            Err(e) => {
                self.observer.on_event(SyncEvent::ListingFailed {
                    prefix: prefix.to_string(),
                    error: e.to_string(),
                });
                report.listing_degraded = true;
                RemoteObjectIndex::empty()
            }
        };

        if let Err(e) = self
            .process_files(unit, &prefix, &index, storage_class, &mut report)
            .await
        {
            self.observer.on_event(SyncEvent::UnitReadFailed {
                source_path: unit.source_path.clone(),
                error: e.to_string(),
            });
            report.read_failed = true;
        }

        self.observer.on_event(SyncEvent::UnitFinished {
            report: report.clone(),
        });
        report
    }

    async fn process_files(
        &self,
        unit: &BackupUnit,
        prefix: &KeyPrefix,
        index: &RemoteObjectIndex,
        storage_class: Option<String>,
        report: &mut UnitReport,
    ) -> std::io::Result<()> {
        let mut entries = tokio::fs::read_dir(&unit.source_path).await?;

        loop {
            // A failed read is recorded and the listing resumes; the directory
            // stream reports end-of-stream after an error.
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => {
                    let outcome = self.fail(
                        &unit.source_path,
                        prefix.as_str(),
                        UploadError::Read {
                            path: unit.source_path.clone(),
                            source,
                        },
                    );
                    report.record(&outcome);
                    continue;
                }
            };

            let path = entry.path();

            // Symlinks are followed; links to directories belong to no unit
            let modified = match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_dir() => continue,
                Ok(meta) => meta.modified().map(DateTime::<Utc>::from),
                Err(e) => Err(e),
            };

            let key = entry
                .file_name()
                .into_string()
                .map_err(|raw| {
                    ValidationError::NonUtf8PathComponent(raw.to_string_lossy().into_owned())
                })
                .and_then(|file_name| destination_key(prefix, &file_name, unit.gzip));

            let outcome = match (key, modified) {
                (Err(e), _) => {
                    let shown = entry.file_name().to_string_lossy().into_owned();
                    self.fail(&path, &shown, e.into())
                }
                (Ok(key), Err(source)) => {
                    self.fail(&path, key.as_str(), UploadError::Read { path: path.clone(), source })
                }
                (Ok(key), Ok(modified)) => {
                    let file = LocalFile { path, modified };
                    self.reconcile_file(&file, &key, index, unit.gzip, storage_class.clone())
                        .await
                }
            };

            report.record(&outcome);
        }

        Ok(())
    }

    async fn reconcile_file(
        &self,
        file: &LocalFile,
        key: &ObjectKey,
        index: &RemoteObjectIndex,
        gzip: bool,
        storage_class: Option<String>,
    ) -> UploadOutcome {
        if index.is_current(key.as_str(), file.modified) {
            self.observer.on_event(SyncEvent::FileSkipped {
                source_path: file.path.clone(),
                key: key.to_string(),
            });
            return UploadOutcome::Skipped(SkipReason::AlreadyCurrent);
        }

        match self.upload(&file.path, key, gzip, storage_class).await {
            Ok(url) => {
                self.observer.on_event(SyncEvent::FileUploaded {
                    source_path: file.path.clone(),
                    key: key.to_string(),
                    url: url.clone(),
                });
                UploadOutcome::Uploaded(url)
            }
            Err(e) => self.fail(&file.path, key.as_str(), e),
        }
    }

    async fn upload(
        &self,
        path: &Path,
        key: &ObjectKey,
        gzip: bool,
        storage_class: Option<String>,
    ) -> Result<String, UploadError> {
        let (body, options) = if gzip {
            let (compressed, content_type) = compress_file(path).await?;
            (
                UploadBody::Buffered(compressed),
                PutOptions {
                    content_type: Some(content_type),
                    content_encoding: Some(GZIP_ENCODING.to_string()),
                    storage_class,
                },
            )
        } else {
            (
                UploadBody::File(path.to_path_buf()),
                PutOptions {
                    storage_class,
                    ..Default::default()
                },
            )
        };

        Ok(self.store.put(key, body, options).await?)
    }

    fn fail(&self, path: &Path, key: &str, error: UploadError) -> UploadOutcome {
        self.observer.on_event(SyncEvent::FileFailed {
            source_path: path.to_path_buf(),
            key: key.to_string(),
            error: error.to_string(),
        });
        UploadOutcome::Failed(error)
    }
}

/// Destination key of a file: prefix + base name, plus `.gz` for gzip units
pub fn destination_key(
    prefix: &KeyPrefix,
    file_name: &str,
    gzip: bool,
) -> Result<ObjectKey, ValidationError> {
    let key = prefix.key_for(file_name)?;
    if gzip {
        key.with_suffix(GZIP_SUFFIX)
    } else {
        Ok(key)
    }
}

/// Read the whole file, gzip it and resolve the content type of the
/// uncompressed data. The CPU part runs on the blocking pool.
async fn compress_file(path: &Path) -> Result<(Bytes, String), UploadError> {
    let data = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let owned_path = path.to_path_buf();
    let joined = tokio::task::spawn_blocking(move || {
        let content_type = content::content_type(&owned_path, &data);
        content::gzip(&data).map(|compressed| (Bytes::from(compressed), content_type))
    })
    .await
    .map_err(|e| UploadError::Compress {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;

    joined.map_err(|source| UploadError::Compress {
        path: path.to_path_buf(),
        source,
    })
}
