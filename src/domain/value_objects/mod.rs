mod bucket_name;
mod key_prefix;
mod object_key;

pub use bucket_name::BucketName;
pub use key_prefix::KeyPrefix;
pub use object_key::{ObjectKey, MAX_KEY_LEN};
