//! Gatepass API Library
//!
//! This crate provides the HTTP handlers, intake pipeline services, and
//! application setup for the visitor-entry API.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod services;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use services::intake::{
    GateDecision, IntakeContext, PhotoUpload, QrGate, ResolvedUnit, SubmissionGuard,
    UnitResolver, VisitorSubmission,
};
