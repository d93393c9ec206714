pub mod audio;
pub mod embedding;
pub mod observability;
pub mod storage;
