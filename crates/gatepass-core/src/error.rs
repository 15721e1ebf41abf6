//! Error types module
//!
//! This module provides the core error types used throughout the Gatepass
//! application. All errors are unified under the `AppError` enum which can
//! represent database, storage, validation, and intake-pipeline errors.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature so the core crate stays usable without a database driver.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DUPLICATE_PENDING")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// QR gate denial. Deliberately undifferentiated: token mismatch,
    /// inactive society, missing record, and expiry all collapse into this
    /// variant so the response leaks nothing about why the gate failed.
    #[error("Access denied")]
    AccessDenied,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unit not found: {0}")]
    UnitNotFound(String),

    #[error("No resident assigned to unit {0}")]
    NoResidentAssigned(String),

    #[error("A request is already pending for phone {phone} and unit {unit_no}")]
    DuplicatePending { phone: String, unit_no: String },

    #[error("Storage error: {0}")]
    Storage(String),

    /// Photo uploaded but the record write failed, and the uploaded object
    /// could not be removed. The orphaned key is surfaced so it can be
    /// cleaned up by an external maintenance job.
    #[error("Submission failed after photo upload; orphaned photo at {photo_key}: {message}")]
    OrphanedUpload { photo_key: String, message: String },

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// Reduces duplication in the ErrorMetadata impl; client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::AccessDenied => (
            403,
            "ACCESS_DENIED",
            false,
            Some("Rescan the QR code or ask the society office for a fresh one"),
            false,
            LogLevel::Debug,
        ),
        AppError::Validation(_) => (
            400,
            "VALIDATION_ERROR",
            false,
            Some("Correct the highlighted fields and resubmit"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnitNotFound(_) => (
            404,
            "UNIT_NOT_FOUND",
            false,
            Some("Check the unit number or contact the society office"),
            false,
            LogLevel::Debug,
        ),
        AppError::NoResidentAssigned(_) => (
            422,
            "NO_RESIDENT_ASSIGNED",
            false,
            Some("Contact the society office to assign a resident to this unit"),
            false,
            LogLevel::Debug,
        ),
        AppError::DuplicatePending { .. } => (
            409,
            "DUPLICATE_PENDING",
            false,
            Some("Wait for the existing request to be decided"),
            false,
            LogLevel::Debug,
        ),
        AppError::Storage(_) => (
            502,
            "STORAGE_ERROR",
            true,
            Some("Retry the submission after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::OrphanedUpload { .. } => (
            502,
            "ORPHANED_UPLOAD",
            true,
            Some("Retry the submission; report the issue if it persists"),
            true,
            LogLevel::Error,
        ),
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry; contact support if the error persists"),
            true,
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            // Undifferentiated by design. Do not leak the denial cause.
            AppError::AccessDenied => "Invalid or expired QR code".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::UnitNotFound(unit_no) => format!("Unit {} not found", unit_no),
            AppError::NoResidentAssigned(unit_no) => {
                format!("No resident assigned to unit {}", unit_no)
            }
            AppError::DuplicatePending { unit_no, .. } => {
                format!("A request is already pending for unit {}", unit_no)
            }
            AppError::Storage(_) | AppError::OrphanedUpload { .. } => {
                "Could not store the visitor photo. Please try again.".to_string()
            }
            AppError::Database(_) => "A database error occurred. Please try again.".to_string(),
            AppError::NotFound(msg) => format!("Not found: {}", msg),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "An internal error occurred. Please try again.".to_string()
            }
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }
}

impl AppError {
    /// Internal error type name, for structured logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::AccessDenied => "AccessDenied",
            AppError::Validation(_) => "Validation",
            AppError::UnitNotFound(_) => "UnitNotFound",
            AppError::NoResidentAssigned(_) => "NoResidentAssigned",
            AppError::DuplicatePending { .. } => "DuplicatePending",
            AppError::Storage(_) => "Storage",
            AppError::OrphanedUpload { .. } => "OrphanedUpload",
            AppError::Database(_) => "Database",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "InternalWithSource",
        }
    }

    /// Full internal message, including source chain where present.
    pub fn detailed_message(&self) -> String {
        match self {
            AppError::InternalWithSource { message, source } => {
                format!("{}: {:#}", message, source)
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_denied_is_undifferentiated() {
        let err = AppError::AccessDenied;
        assert_eq!(err.http_status_code(), 403);
        assert_eq!(err.error_code(), "ACCESS_DENIED");
        // The client message must not mention tokens, expiry, or status.
        let msg = err.client_message().to_lowercase();
        assert!(!msg.contains("token"));
        assert!(!msg.contains("expir") || msg == "invalid or expired qr code");
    }

    #[test]
    fn duplicate_pending_maps_to_conflict() {
        let err = AppError::DuplicatePending {
            phone: "9876543210".to_string(),
            unit_no: "C-102".to_string(),
        };
        assert_eq!(err.http_status_code(), 409);
        assert!(!err.is_recoverable());
        assert!(err.client_message().contains("C-102"));
    }

    #[test]
    fn storage_errors_are_recoverable_and_sensitive() {
        let err = AppError::Storage("connection reset".to_string());
        assert_eq!(err.http_status_code(), 502);
        assert!(err.is_recoverable());
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }
}
