//! Database repositories for the data access layer
//!
//! Each repository owns the queries for one entity. Societies, units, and
//! residents are read-only from this service's perspective; visitor
//! requests are append-only.

pub mod resident;
pub mod society;
pub mod unit;
pub mod visitor_request;

pub use resident::ResidentRepository;
pub use society::SocietyRepository;
pub use unit::UnitRepository;
pub use visitor_request::{VisitorRequestRepository, VisitorRequestRow};
