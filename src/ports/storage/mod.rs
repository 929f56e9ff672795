mod object_store;

pub use object_store::{ObjectStore, PutOptions, UploadBody, LIST_PAGE_SIZE};
