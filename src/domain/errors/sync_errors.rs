use std::path::PathBuf;

use crate::domain::errors::{StorageError, ValidationError};

/// Errors raised while turning a backup folder declaration into units
#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    #[error("source path of backup folder is blank")]
    BlankSource,

    #[error("destination prefix of backup folder {source_path} is blank")]
    BlankDestination { source_path: String },

    #[error("invalid destination prefix for {source_path}: {reason}")]
    InvalidDestination {
        source_path: String,
        reason: ValidationError,
    },

    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{} is not a directory", root.display())]
    NotADirectory { root: PathBuf },

    #[error("partitioning {} was aborted: {message}", root.display())]
    Aborted { root: PathBuf, message: String },
}

impl PartitionError {
    /// Blank or malformed declarations are configuration mistakes and abort the whole run
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            PartitionError::Walk { .. }
                | PartitionError::NotADirectory { .. }
                | PartitionError::Aborted { .. }
        )
    }
}

/// Errors that abort a sync run before any unit is reconciled
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("no backup folders declared")]
    NoFolders,

    #[error("backup folder {index} is invalid: {source}")]
    InvalidDeclaration {
        index: usize,
        #[source]
        source: PartitionError,
    },

    #[error(
        "directories {} and {} both map to destination prefix '{prefix}'",
        first.display(),
        second.display()
    )]
    OverlappingPrefixes {
        first: PathBuf,
        second: PathBuf,
        prefix: String,
    },
}

/// Why a single file could not be uploaded
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to gzip {}: {source}", path.display())]
    Compress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid destination key: {0}")]
    InvalidKey(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
