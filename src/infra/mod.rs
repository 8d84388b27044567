//! Infrastructure adapters and runtime bootstrap.

pub mod cockpit;
pub mod enquiry;
pub mod error;
pub mod telemetry;
