//! Gatepass Database Library
//!
//! Postgres repositories implementing the store traits from
//! `gatepass-core`. Migrations live in the workspace `migrations/`
//! directory and are applied at startup by the API's setup code.

pub mod db;

pub use db::{
    ResidentRepository, SocietyRepository, UnitRepository, VisitorRequestRepository,
    VisitorRequestRow,
};
