// Infrastructure error mapping
pub mod error;

// Storage implementations
pub mod apache_object_store_adapter;
pub mod s3;

pub use apache_object_store_adapter::ApacheObjectStoreAdapter;
pub use s3::{S3Settings, build_s3_store};
