//! Storage abstraction trait
//!
//! This module defines the Storage trait that all photo storage backends
//! must implement. The intake pipeline only ever writes once per key,
//! reads back for verification, and deletes on orphan cleanup.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// This lets the submission guard work with any backend without coupling
/// to implementation details.
///
/// **Key format:** `visitor_photos/{society_id}/{unix_ms}_{filename}`.
/// See the crate root documentation and the `keys` module.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a photo to the given key and return its retrievable URL.
    async fn upload(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Download a photo by its storage key.
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a photo by its storage key. Used for orphan cleanup when the
    /// record write fails after a successful upload.
    async fn delete(&self, key: &str) -> StorageResult<()>;
}
