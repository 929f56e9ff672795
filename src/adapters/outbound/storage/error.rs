use crate::domain::{errors::StorageError, value_objects::ObjectKey};

/// Map a failed listing onto the domain error
pub fn list_error(prefix: &str, err: object_store::Error) -> StorageError {
    match err {
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => StorageError::AccessDenied {
            key: prefix.to_string(),
            operation: "list".to_string(),
        },
        _ => StorageError::ListFailed {
            prefix: prefix.to_string(),
            message: err.to_string(),
        },
    }
}

/// Map a failed upload onto the domain error
pub fn put_error(key: &ObjectKey, err: object_store::Error) -> StorageError {
    match err {
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => StorageError::AccessDenied {
            key: key.to_string(),
            operation: "put".to_string(),
        },
        object_store::Error::InvalidPath { source } => StorageError::InvalidKey {
            key: key.to_string(),
            message: source.to_string(),
        },
        _ => StorageError::PutFailed {
            key: key.clone(),
            message: err.to_string(),
        },
    }
}

/// Streaming uploads report store failures through `std::io::Error`
pub fn streamed_put_error(key: &ObjectKey, err: std::io::Error) -> StorageError {
    StorageError::PutFailed {
        key: key.clone(),
        message: err.to_string(),
    }
}
