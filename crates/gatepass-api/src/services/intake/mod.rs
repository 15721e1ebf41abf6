//! Visitor intake pipeline
//!
//! Three cooperating stages behind the public visitor-entry form:
//!
//! 1. [`QrGate`] validates the (society, key) pair against the stored
//!    rotating token and its expiry before anything else happens.
//! 2. [`UnitResolver`] maps a human-entered unit identifier to its bound
//!    resident, rejecting unknown units and units with no resident.
//! 3. [`SubmissionGuard`] runs the full precondition chain at submit time,
//!    uploads the photo, and creates exactly one `pending` request.
//!
//! Within one submission the stages run strictly sequentially; a stage
//! failure prevents everything after it. Across concurrent submissions the
//! only protection is the best-effort duplicate-pending check.

mod gate;
mod guard;
mod resolver;
mod types;

pub use gate::{GateDecision, QrGate};
pub use guard::{SubmissionGuard, SubmissionOutcome};
pub use resolver::{ResolvedUnit, UnitResolver};
pub use types::{IntakeContext, PhotoUpload, PhotoPolicy, VisitorSubmission};
