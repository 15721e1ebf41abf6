//! HTTP handlers

pub mod gate;
pub mod health;
pub mod visitor_request;
