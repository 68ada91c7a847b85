//! Matching core for a construction job marketplace: contractors post projects,
//! workers apply, contractors review the applications.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
