pub mod observer;
pub mod storage;
