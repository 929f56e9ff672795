use std::collections::HashMap;
use std::path::{Component, Path};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::{
    domain::{
        errors::{PartitionError, SyncError, ValidationError},
        models::{dir_with_separator, BackupFolderDeclaration, BackupUnit},
        value_objects::KeyPrefix,
    },
    ports::{SyncEvent, SyncObserver},
    services::exclusion::ExclusionMatcher,
};

/// Splits a declared folder into one [`BackupUnit`] per non-excluded directory
#[derive(Clone)]
pub struct DirectoryPartitioner {
    excludes: Arc<ExclusionMatcher>,
    observer: Option<Arc<dyn SyncObserver>>,
}

impl DirectoryPartitioner {
    pub fn new(excludes: Arc<ExclusionMatcher>) -> Self {
        Self {
            excludes,
            observer: None,
        }
    }

    /// Report pruned directories to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Reject declarations with a blank source or destination
    pub fn validate(declaration: &BackupFolderDeclaration) -> Result<KeyPrefix, PartitionError> {
        if declaration.has_blank_source() {
            return Err(PartitionError::BlankSource);
        }

        let source_path = declaration.source_path.display().to_string();
        if declaration.has_blank_destination() {
            return Err(PartitionError::BlankDestination { source_path });
        }

        KeyPrefix::new(&declaration.destination_prefix)
            .map_err(|reason| PartitionError::InvalidDestination { source_path, reason })
    }

    /// Walk the declaration's source tree depth-first and emit a unit for the
    /// root and every directory below it that no exclusion pattern prunes.
    /// Files are not looked at.
    pub fn partition(
        &self,
        declaration: &BackupFolderDeclaration,
    ) -> Result<Vec<BackupUnit>, PartitionError> {
        let destination_root = Self::validate(declaration)?;
        let root = declaration.source_path.as_path();

        let mut units = Vec::new();
        let mut walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            let rendered = dir_with_separator(entry.path());
            match self.excludes.matching_pattern(&rendered) {
                Some(pattern) => {
                    self.notify(SyncEvent::DirectoryExcluded {
                        path: rendered.clone(),
                        pattern: pattern.to_string(),
                    });
                    false
                }
                None => true,
            }
        });

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|source| PartitionError::Walk {
                root: root.to_path_buf(),
                source,
            })?;

            if !entry.file_type().is_dir() {
                continue;
            }

            // A directory whose name has no key form is dropped together with
            // its subtree; the rest of the declaration still syncs.
            let destination_prefix = match map_to_prefix(root, entry.path(), &destination_root) {
                Ok(prefix) => prefix,
                Err(reason) => {
                    self.notify(SyncEvent::DirectorySkipped {
                        path: entry.path().to_path_buf(),
                        error: reason.to_string(),
                    });
                    walker.skip_current_dir();
                    continue;
                }
            };

            units.push(BackupUnit {
                source_path: entry.into_path(),
                destination_prefix,
                gzip: declaration.gzip,
                storage_class: declaration.storage_class.clone(),
            });
        }

        if units.is_empty() && !root.is_dir() && !self.root_excluded(root) {
            return Err(PartitionError::NotADirectory {
                root: root.to_path_buf(),
            });
        }

        Ok(units)
    }

    fn root_excluded(&self, root: &Path) -> bool {
        self.excludes.is_excluded(&dir_with_separator(root))
    }

    fn notify(&self, event: SyncEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(event);
        }
    }
}

/// Substitute the source root with the destination root inside `dir`, using
/// `/` as the only separator. Names that are not valid UTF-8 are rejected
/// rather than lossily converted, so distinct directories never share a prefix.
pub fn map_to_prefix(
    root: &Path,
    dir: &Path,
    destination_root: &KeyPrefix,
) -> Result<KeyPrefix, ValidationError> {
    let relative = dir.strip_prefix(root).unwrap_or(dir);

    let mut mapped = destination_root.as_str().to_string();
    for component in relative.components() {
        if let Component::Normal(name) = component {
            let name = name.to_str().ok_or_else(|| {
                ValidationError::NonUtf8PathComponent(name.to_string_lossy().into_owned())
            })?;
            mapped.push_str(name);
            mapped.push('/');
        }
    }

    KeyPrefix::new(&mapped.replace('\\', "/"))
}

/// Units run concurrently without locking because no two of them share a
/// destination prefix. Fail when a run would break that.
pub fn ensure_disjoint(units: &[BackupUnit]) -> Result<(), SyncError> {
    let mut seen: HashMap<&KeyPrefix, &BackupUnit> = HashMap::with_capacity(units.len());

    for unit in units {
        if let Some(previous) = seen.insert(&unit.destination_prefix, unit) {
            return Err(SyncError::OverlappingPrefixes {
                first: previous.source_path.clone(),
                second: unit.source_path.clone(),
                prefix: unit.destination_prefix.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_map_to_prefix() {
        let dest = KeyPrefix::new("backups/app/").unwrap();

        let root = Path::new("/data/app/");
        assert_eq!(
            map_to_prefix(root, Path::new("/data/app/"), &dest).unwrap().as_str(),
            "backups/app/"
        );
        assert_eq!(
            map_to_prefix(root, Path::new("/data/app/logs"), &dest).unwrap().as_str(),
            "backups/app/logs/"
        );
        assert_eq!(
            map_to_prefix(root, Path::new("/data/app/logs/2024"), &dest).unwrap().as_str(),
            "backups/app/logs/2024/"
        );
    }

    #[test]
    fn test_map_to_prefix_without_trailing_separators() {
        let dest = KeyPrefix::new("backups").unwrap();
        assert_eq!(
            map_to_prefix(Path::new("/data/app"), Path::new("/data/app/logs"), &dest)
                .unwrap()
                .as_str(),
            "backups/logs/"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_map_to_prefix_rejects_empty_segments() {
        let dest = KeyPrefix::new("aa").unwrap();
        assert!(matches!(
            map_to_prefix(Path::new("/a"), Path::new("/a/\\x"), &dest),
            Err(ValidationError::PrefixContainsDoubleSlash(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_map_to_prefix_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dest = KeyPrefix::new("aa").unwrap();
        let dir = Path::new("/a").join(OsStr::from_bytes(b"\xff"));
        assert!(matches!(
            map_to_prefix(Path::new("/a"), &dir, &dest),
            Err(ValidationError::NonUtf8PathComponent(_))
        ));
    }

    #[test]
    fn test_validate_blank_fields() {
        let blank_source = BackupFolderDeclaration::new("  ", "backups/");
        assert!(matches!(
            DirectoryPartitioner::validate(&blank_source),
            Err(PartitionError::BlankSource)
        ));

        let blank_dest = BackupFolderDeclaration::new("/data", " \t");
        assert!(matches!(
            DirectoryPartitioner::validate(&blank_dest),
            Err(PartitionError::BlankDestination { .. })
        ));
    }

    #[test]
    fn test_ensure_disjoint() {
        let unit = |dir: &str, prefix: &str| BackupUnit {
            source_path: PathBuf::from(dir),
            destination_prefix: KeyPrefix::new(prefix).unwrap(),
            gzip: false,
            storage_class: String::new(),
        };

        let disjoint = vec![unit("/a/", "x/"), unit("/a/sub/", "x/sub/"), unit("/b/", "y/")];
        assert!(ensure_disjoint(&disjoint).is_ok());

        let overlapping = vec![unit("/a/", "x/"), unit("/b/", "x/")];
        match ensure_disjoint(&overlapping) {
            Err(SyncError::OverlappingPrefixes { first, second, prefix }) => {
                assert_eq!(first, PathBuf::from("/a/"));
                assert_eq!(second, PathBuf::from("/b/"));
                assert_eq!(prefix, "x/");
            }
            other => panic!("expected overlap error, got {:?}", other),
        }
    }
}
