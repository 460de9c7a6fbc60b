//! FJSP domain model.
//!
//! - [`Instance`] / [`Operation`]: immutable problem description with eager
//!   structural validation
//! - [`Schedule`] / [`ScheduledOperation`]: decoded placements with a
//!   feasibility verifier
//! - [`InstanceSpec`] / [`generate`]: random instance construction

mod generator;
mod instance;
mod schedule;

pub use generator::{generate, InstanceSpec};
pub use instance::{Instance, Operation};
pub use schedule::{Schedule, ScheduledOperation};
