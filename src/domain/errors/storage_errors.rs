use crate::domain::value_objects::ObjectKey;

/// Errors that can occur while talking to the object store
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Listing the objects under a prefix failed
    ListFailed { prefix: String, message: String },

    /// Uploading a single object failed
    PutFailed { key: ObjectKey, message: String },

    /// Access denied by the backend
    AccessDenied { key: String, operation: String },

    /// Object key returned by the backend could not be used
    InvalidKey { key: String, message: String },

    /// Reading the local body of an upload failed
    LocalIo { path: String, message: String },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ListFailed { prefix, message } => {
                write!(f, "Failed to list objects under '{}': {}", prefix, message)
            }
            StorageError::PutFailed { key, message } => {
                write!(f, "Failed to upload object '{}': {}", key, message)
            }
            StorageError::AccessDenied { key, operation } => {
                write!(
                    f,
                    "Access denied for operation '{}' on object: {}",
                    operation, key
                )
            }
            StorageError::InvalidKey { key, message } => {
                write!(f, "Invalid object key '{}': {}", key, message)
            }
            StorageError::LocalIo { path, message } => {
                write!(f, "Failed to read local file '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
