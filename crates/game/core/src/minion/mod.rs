//! Shadow soldiers: inherited stats, army limits and the per-minion AI.
//!
//! The core never holds entity handles. A [`MinionController`] keeps the
//! minion's id and re-resolves it, its owner and its target through a
//! [`crate::WorldView`] each tick, emitting [`MinionCommand`]s for the host.

mod brain;
mod controller;
mod record;

pub use brain::{Blackboard, Decision, MinionBrain};
pub use controller::{MinionCommand, MinionController, MinionState};
pub use record::{ArmyBuff, MinionRecord, MinionSeed, army_cap};
