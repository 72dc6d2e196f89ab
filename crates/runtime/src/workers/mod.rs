//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the authority and applies every command in
//! arrival order.

mod simulation;

pub use simulation::{Command, SimulationWorker};
