//! Gatepass Storage Library
//!
//! This crate provides the storage abstraction for visitor photos and its
//! backends (S3 and local filesystem).
//!
//! # Storage key format
//!
//! Photo keys are society-scoped: `visitor_photos/{society_id}/{unix_ms}_{filename}`.
//! The millisecond timestamp prefix makes keys collision-resistant across
//! concurrent submissions; filenames are sanitized before they reach a key.
//! Keys must not contain `..` or a leading `/`. Key generation is
//! centralized in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use gatepass_core::StorageBackend;
pub use keys::photo_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
