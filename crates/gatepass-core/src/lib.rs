//! Gatepass Core Library
//!
//! This crate provides the domain models, error types, configuration,
//! validation, and store traits shared across all Gatepass components.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod stores;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
pub use stores::{ResidentStore, SocietyStore, UnitStore, VisitorRequestStore};
