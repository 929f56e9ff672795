use std::path::PathBuf;

/// One configured top-level folder to back up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFolderDeclaration {
    /// Local root directory
    pub source_path: PathBuf,
    /// Destination prefix the root maps to inside the bucket
    pub destination_prefix: String,
    /// Gzip every file of this tree before upload
    pub gzip: bool,
    /// Storage class override, blank means "use the default"
    pub storage_class: String,
}

impl BackupFolderDeclaration {
    pub fn new(source_path: impl Into<PathBuf>, destination_prefix: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            destination_prefix: destination_prefix.into(),
            gzip: false,
            storage_class: String::new(),
        }
    }

    pub fn with_gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    pub fn with_storage_class(mut self, storage_class: impl Into<String>) -> Self {
        self.storage_class = storage_class.into();
        self
    }

    pub fn has_blank_source(&self) -> bool {
        self.source_path.to_string_lossy().trim().is_empty()
    }

    pub fn has_blank_destination(&self) -> bool {
        self.destination_prefix.trim().is_empty()
    }
}
