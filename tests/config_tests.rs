use std::sync::Arc;

use object_store::{memory::InMemory, ObjectStore as _};
use object_store_backup::{
    AppBuilder, AppConfig, BackupConfig, BackupService, ConfigError, RecordingObserver,
};

fn write_config(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("config.yml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
aws:
  s3BucketName: nightly-backups
  region: us-east-2
backup:
  defaultS3StorageClass: STANDARD_IA
  folders:
    - src: /srv/www
      dest: www
  globalExcludes:
    - "**/.cache/"
"#,
    );

    let config = BackupConfig::load(&path).unwrap();

    assert_eq!(config.bucket().unwrap().as_str(), "nightly-backups");
    assert_eq!(config.aws.region.as_deref(), Some("us-east-2"));
    assert_eq!(config.declarations().len(), 1);
    assert!(config
        .exclusion_matcher()
        .unwrap()
        .is_excluded("/srv/www/.cache/"));
}

#[test]
fn test_unparseable_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "backup:\n  folders: [unterminated\n");

    assert!(matches!(BackupConfig::load(&path), Err(ConfigError::Parse(_))));
}

#[tokio::test]
async fn test_config_drives_a_sync() {
    let data = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(data.path().join("keep")).unwrap();
    std::fs::create_dir_all(data.path().join("skip.me")).unwrap();
    std::fs::write(data.path().join("keep").join("k.txt"), "keep").unwrap();
    std::fs::write(data.path().join("skip.me").join("s.txt"), "skip").unwrap();

    let yaml = format!(
        r#"
aws:
  s3BucketName: test-bucket
backup:
  defaultPrefixToPrepend: nightly
  folders:
    - srcPath: {}
      destPrefix: data
      gzip: true
  globalExcludes:
    - "**/skip.me/"
"#,
        data.path().display()
    );
    let config = BackupConfig::from_yaml(&yaml).unwrap();

    let store = Arc::new(InMemory::new());
    let app_config = AppConfig::from_backup_config(&config).unwrap();
    let app = AppBuilder::new()
        .with_config(app_config)
        .with_backend_store(store.clone())
        .with_observer(Arc::new(RecordingObserver::new()))
        .build()
        .await
        .unwrap();

    let summary = app.orchestrator.run(&config.declarations()).await.unwrap();

    assert_eq!(summary.uploaded, 1);
    let head = store
        .head(&object_store::path::Path::from("nightly/data/keep/k.txt.gz"))
        .await
        .unwrap();
    assert!(head.size > 0);
}
