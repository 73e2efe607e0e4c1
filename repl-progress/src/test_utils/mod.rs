//! Helpers shared by unit and integration tests.

pub mod job;
pub mod notify;
