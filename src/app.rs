use object_store::{memory::InMemory, ObjectStore as ApacheObjectStore};
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::{
    adapters::outbound::{
        observer::TracingObserver,
        storage::{build_s3_store, ApacheObjectStoreAdapter, S3Settings},
    },
    config::{BackupConfig, ConfigError},
    domain::value_objects::{BucketName, KeyPrefix},
    ports::{storage::ObjectStore, SyncObserver},
    services::{DirectoryPartitioner, ExclusionMatcher, ReconcileSettings, Reconciler, SyncOrchestrator},
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub excludes: ExclusionMatcher,
    pub global_prefix: KeyPrefix,
    pub default_storage_class: Option<String>,
    pub max_concurrent_units: Option<NonZeroUsize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory {
                bucket: BucketName::local(),
            },
            excludes: ExclusionMatcher::new(),
            global_prefix: KeyPrefix::root(),
            default_storage_class: None,
            max_concurrent_units: None,
        }
    }
}

impl AppConfig {
    /// Application settings for a validated backup config, targeting S3
    pub fn from_backup_config(config: &BackupConfig) -> Result<Self, AppError> {
        let mut settings = S3Settings::new(config.bucket()?);
        settings.region = config.aws.region.clone().filter(|r| !r.trim().is_empty());
        settings.endpoint = config.aws.endpoint.clone().filter(|e| !e.trim().is_empty());
        settings.allow_http = config.aws.allow_http;

        Ok(Self {
            storage_backend: StorageBackend::S3(settings),
            excludes: config.exclusion_matcher()?,
            global_prefix: config.resolve_global_prefix()?,
            default_storage_class: config.default_storage_class(),
            max_concurrent_units: config.backup.max_concurrent_units,
        })
    }
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory { bucket: BucketName },
    S3(S3Settings),
}

impl StorageBackend {
    pub fn bucket(&self) -> &BucketName {
        match self {
            StorageBackend::InMemory { bucket } => bucket,
            StorageBackend::S3(settings) => &settings.bucket,
        }
    }
}

/// Application dependencies container
pub struct AppDependencies {
    pub object_store: Arc<dyn ObjectStore>,
    pub observer: Arc<dyn SyncObserver>,
}

/// Application services container
pub struct AppServices {
    pub orchestrator: SyncOrchestrator,
    pub object_store: Arc<dyn ObjectStore>,
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
    backend: Option<Arc<dyn ApacheObjectStore>>,
    observer: Option<Arc<dyn SyncObserver>>,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            backend: None,
            observer: None,
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Use an already constructed object_store backend instead of building
    /// one from [`StorageBackend`]. The configured bucket is still used for
    /// the URLs reported after uploads.
    pub fn with_backend_store(mut self, store: Arc<dyn ApacheObjectStore>) -> Self {
        self.backend = Some(store);
        self
    }

    /// Receive sync events. Defaults to [`TracingObserver`].
    pub fn with_observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_excludes(mut self, excludes: ExclusionMatcher) -> Self {
        self.config.excludes = excludes;
        self
    }

    pub fn with_global_prefix(mut self, prefix: KeyPrefix) -> Self {
        self.config.global_prefix = prefix;
        self
    }

    pub fn with_default_storage_class(mut self, storage_class: Option<String>) -> Self {
        self.config.default_storage_class = storage_class;
        self
    }

    pub fn with_max_concurrent_units(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.config.max_concurrent_units = limit;
        self
    }

    /// Build the application dependencies
    pub async fn build_dependencies(&self) -> Result<AppDependencies, AppError> {
        let object_store = self.create_storage_adapter()?;
        let observer = self
            .observer
            .clone()
            .unwrap_or_else(|| Arc::new(TracingObserver::new()) as Arc<dyn SyncObserver>);

        Ok(AppDependencies {
            object_store,
            observer,
        })
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let deps = self.build_dependencies().await?;

        let partitioner = DirectoryPartitioner::new(Arc::new(self.config.excludes.clone()))
            .with_observer(deps.observer.clone());

        let reconciler = Reconciler::new(
            deps.object_store.clone(),
            deps.observer.clone(),
            ReconcileSettings {
                global_prefix: self.config.global_prefix.clone(),
                default_storage_class: self.config.default_storage_class.clone(),
            },
        );

        let orchestrator = SyncOrchestrator::new(partitioner, reconciler, deps.observer)
            .with_max_concurrent_units(self.config.max_concurrent_units);

        Ok(AppServices {
            orchestrator,
            object_store: deps.object_store,
        })
    }

    /// Create the storage adapter based on configuration
    fn create_storage_adapter(&self) -> Result<Arc<dyn ObjectStore>, AppError> {
        let bucket = self.config.storage_backend.bucket().clone();

        let backend: Arc<dyn ApacheObjectStore> = match (&self.backend, &self.config.storage_backend) {
            (Some(store), _) => store.clone(),
            (None, StorageBackend::InMemory { .. }) => Arc::new(InMemory::new()),
            (None, StorageBackend::S3(settings)) => {
                build_s3_store(settings).map_err(|e| AppError::StorageInit {
                    message: format!("{:#}", e),
                })?
            }
        };

        Ok(Arc::new(ApacheObjectStoreAdapter::new(backend, bucket)))
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },
}

/// Convenience functions for common configurations
///
/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory {
            bucket: BucketName::local(),
        })
        .build()
        .await
}

/// Create the S3-backed application described by a backup config
pub async fn create_app_from_config(
    config: &BackupConfig,
    observer: Arc<dyn SyncObserver>,
) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_config(AppConfig::from_backup_config(config)?)
        .with_observer(observer)
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::outbound::observer::RecordingObserver,
        domain::models::BackupFolderDeclaration,
        domain::SyncError,
        ports::BackupService,
    };

    #[tokio::test]
    async fn test_create_in_memory_app() {
        let app = create_in_memory_app().await.unwrap();

        let index = app
            .object_store
            .list_shallow(&KeyPrefix::root())
            .await
            .unwrap();
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_app_builder_runs_a_sync() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let observer = Arc::new(RecordingObserver::new());
        let app = AppBuilder::new()
            .with_observer(observer.clone())
            .with_global_prefix(KeyPrefix::new("host").unwrap())
            .build()
            .await
            .unwrap();

        let summary = app
            .orchestrator
            .run(&[BackupFolderDeclaration::new(dir.path(), "backups")])
            .await
            .unwrap();

        assert_eq!(summary.uploaded, 1);
        assert_eq!(observer.uploaded_keys(), vec!["host/backups/a.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_declarations_are_rejected() {
        let app = create_in_memory_app().await.unwrap();
        assert!(matches!(app.orchestrator.run(&[]).await, Err(SyncError::NoFolders)));
    }

    #[test]
    fn test_app_config_from_backup_config() {
        let config = BackupConfig::from_yaml(
            r#"
aws:
  s3BucketName: my-backups
  region: eu-west-1
  endpoint: http://localhost:9000
  allowHttp: true
backup:
  defaultS3StorageClass: STANDARD_IA
  defaultPrefixToPrepend: nightly
  maxConcurrentUnits: 4
  folders:
    - src: /data
      dest: data
"#,
        )
        .unwrap();

        let app_config = AppConfig::from_backup_config(&config).unwrap();

        assert_eq!(app_config.storage_backend.bucket().as_str(), "my-backups");
        assert_eq!(app_config.global_prefix.as_str(), "nightly/");
        assert_eq!(app_config.default_storage_class.as_deref(), Some("STANDARD_IA"));
        assert_eq!(app_config.max_concurrent_units, NonZeroUsize::new(4));
        match app_config.storage_backend {
            StorageBackend::S3(settings) => {
                assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
                assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:9000"));
                assert!(settings.allow_http);
            }
            other => panic!("expected S3 backend, got {:?}", other),
        }
    }
}
