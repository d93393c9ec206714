mod gcs_storage;
mod local_storage;
mod storage_factory;
mod transfer;

pub use gcs_storage::GcsObjectStorage;
pub use local_storage::LocalObjectStorage;
pub use storage_factory::ObjectStorageFactory;
pub use transfer::GuardedUpload;
