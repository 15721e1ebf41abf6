//! API constants
//!
//! All public endpoints are versioned under `/api/v0/`.

/// Versioned API path prefix.
pub const API_PREFIX: &str = "/api/v0";
