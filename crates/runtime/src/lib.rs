//! Authoritative session runtime for the Shadow Monarch progression core.
//!
//! This crate owns every joined player's capability, feeds host
//! notifications through the event bridge, drives shadow minions, and keeps
//! observers in sync through full snapshots. Hosts embed [`Runtime`] and talk
//! to it through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the handle and error types downstream callers see
//! - [`authority`] holds per-player capabilities and request handling
//! - [`minions`] drives each summoned shadow's brain
//! - [`protocol`] and [`observer`] cover the authoritative/observer split
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] persists player saves between sessions
//! - [`host`] and [`storage`] are the seams to the host engine
pub mod api;
pub mod authority;
pub mod events;
pub mod host;
pub mod minions;
pub mod observer;
pub mod protocol;
pub mod repository;
pub mod runtime;
pub mod storage;

mod workers;

#[cfg(test)]
mod testing;

pub use api::{RequestError, Result, RuntimeError, RuntimeHandle};
pub use authority::{Authority, PlayerCapability};
pub use events::{Event, EventBus, MinionEvent, ProgressionEvent, SkillEvent, Topic};
pub use host::{ChannelSink, Outbound, SnapshotSink, WorldHost};
pub use minions::{MinionManager, MinionTick};
pub use observer::Observer;
pub use protocol::{ClientMessage, CodecError, ServerMessage, Snapshot, WireCodec};
pub use repository::{
    FileSaveRepository, InMemorySaveRepository, PlayerRepository, RepositoryError, SaveData,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use storage::{ItemStack, ItemStorage, StorageError};
