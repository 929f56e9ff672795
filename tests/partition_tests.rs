use std::path::Path;
use std::sync::Arc;

use object_store_backup::{
    BackupFolderDeclaration, DirectoryPartitioner, ExclusionMatcher, PartitionError,
    RecordingObserver, SyncEvent,
};

fn make_dirs(root: &Path, dirs: &[&str]) {
    for dir in dirs {
        std::fs::create_dir_all(root.join(dir)).unwrap();
    }
}

fn prefixes(units: &[object_store_backup::BackupUnit]) -> Vec<String> {
    let mut prefixes: Vec<String> = units
        .iter()
        .map(|unit| unit.destination_prefix.to_string())
        .collect();
    prefixes.sort();
    prefixes
}

#[test]
fn test_every_directory_becomes_a_unit() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(dir.path(), &["logs/2024", "logs/2025", "conf"]);
    std::fs::write(dir.path().join("logs").join("app.log"), "x").unwrap();

    let partitioner = DirectoryPartitioner::new(Arc::new(ExclusionMatcher::new()));
    let units = partitioner
        .partition(&BackupFolderDeclaration::new(dir.path(), "backups/app/"))
        .unwrap();

    assert_eq!(
        prefixes(&units),
        vec![
            "backups/app/",
            "backups/app/conf/",
            "backups/app/logs/",
            "backups/app/logs/2024/",
            "backups/app/logs/2025/",
        ]
    );
}

#[test]
fn test_units_inherit_folder_settings() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(dir.path(), &["nested"]);

    let partitioner = DirectoryPartitioner::new(Arc::new(ExclusionMatcher::new()));
    let units = partitioner
        .partition(
            &BackupFolderDeclaration::new(dir.path(), "data")
                .with_gzip(true)
                .with_storage_class("GLACIER"),
        )
        .unwrap();

    assert_eq!(units.len(), 2);
    assert!(units.iter().all(|unit| unit.gzip));
    assert!(units.iter().all(|unit| unit.storage_class == "GLACIER"));
}

#[test]
fn test_excluded_subtree_is_pruned_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(
        dir.path(),
        &["web/node_modules/left-pad", "web/src", "api/target/debug"],
    );

    let observer = Arc::new(RecordingObserver::new());
    let excludes = ExclusionMatcher::from_patterns(&["**/node_modules/", "**/target/"]).unwrap();
    let partitioner =
        DirectoryPartitioner::new(Arc::new(excludes)).with_observer(observer.clone());

    let units = partitioner
        .partition(&BackupFolderDeclaration::new(dir.path(), "code"))
        .unwrap();

    assert_eq!(
        prefixes(&units),
        vec!["code/", "code/api/", "code/web/", "code/web/src/"]
    );

    let excluded: Vec<String> = observer
        .events()
        .into_iter()
        .filter_map(|event| match event {
            SyncEvent::DirectoryExcluded { pattern, .. } => Some(pattern),
            _ => None,
        })
        .collect();
    assert_eq!(excluded.len(), 2);
    assert!(excluded.contains(&"**/node_modules/".to_string()));
    assert!(excluded.contains(&"**/target/".to_string()));
}

#[test]
fn test_excluded_root_yields_no_units() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("cache");
    make_dirs(&root, &["inner"]);

    let excludes = ExclusionMatcher::from_patterns(&["**/cache/"]).unwrap();
    let partitioner = DirectoryPartitioner::new(Arc::new(excludes));

    let units = partitioner
        .partition(&BackupFolderDeclaration::new(&root, "cache"))
        .unwrap();
    assert!(units.is_empty());
}

#[test]
fn test_missing_root_is_a_walk_error() {
    let dir = tempfile::tempdir().unwrap();
    let partitioner = DirectoryPartitioner::new(Arc::new(ExclusionMatcher::new()));

    let err = partitioner
        .partition(&BackupFolderDeclaration::new(dir.path().join("nope"), "nope"))
        .unwrap_err();

    assert!(matches!(err, PartitionError::Walk { .. }));
    assert!(!err.is_fatal());
}

#[test]
fn test_file_root_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("single.txt");
    std::fs::write(&file, "x").unwrap();

    let partitioner = DirectoryPartitioner::new(Arc::new(ExclusionMatcher::new()));
    let err = partitioner
        .partition(&BackupFolderDeclaration::new(&file, "single"))
        .unwrap_err();

    assert!(matches!(err, PartitionError::NotADirectory { .. }));
}

#[test]
fn test_blank_destination_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let partitioner = DirectoryPartitioner::new(Arc::new(ExclusionMatcher::new()));

    let err = partitioner
        .partition(&BackupFolderDeclaration::new(dir.path(), ""))
        .unwrap_err();

    assert!(matches!(err, PartitionError::BlankDestination { .. }));
    assert!(err.is_fatal());
}
