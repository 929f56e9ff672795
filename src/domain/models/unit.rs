use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::domain::value_objects::KeyPrefix;

/// One directory level of a declared tree, reconciled independently.
///
/// Only the files directly inside `source_path` belong to the unit; nested
/// directories are units of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupUnit {
    pub source_path: PathBuf,
    pub destination_prefix: KeyPrefix,
    pub gzip: bool,
    pub storage_class: String,
}

/// Render a directory path with exactly one trailing platform separator
pub fn dir_with_separator(path: &Path) -> String {
    let mut rendered = path.to_string_lossy().into_owned();
    if !rendered.ends_with(MAIN_SEPARATOR) && !rendered.ends_with('/') {
        rendered.push(MAIN_SEPARATOR);
    }
    rendered
}
