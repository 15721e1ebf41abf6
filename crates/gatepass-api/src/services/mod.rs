//! Service layer

pub mod intake;
