//! Domain models
//!
//! Typed records for the entities the intake pipeline touches. Societies and
//! units are read-only here; visitor requests are the one collection this
//! service creates.

pub mod society;
pub mod unit;
pub mod visitor_request;

pub use society::{Society, SocietyStatus};
pub use unit::Unit;
pub use visitor_request::{
    NewVisitorRequest, Purpose, RequestSource, RequestStatus, VisitorRequest,
    VisitorRequestResponse,
};
