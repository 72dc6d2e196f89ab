//! Progression rules for the Shadow Monarch system.
//!
//! `monarch-core` holds the pure decision logic: the per-player progression
//! record, the skill catalog and activation protocol, the shadow soldier AI
//! and the event bridge that turns engine notifications into rewards. It
//! never owns engine objects. The host feeds it ticks, [`WorldEvent`]s and a
//! [`WorldView`], and applies the [`WorldCommand`]s and [`MinionCommand`]s it
//! returns.
pub mod bridge;
pub mod config;
pub mod error;
pub mod minion;
pub mod progression;
pub mod rng;
pub mod skill;
pub mod types;
pub mod world;

pub use bridge::{
    EntityClassifier, EntityTier, EventBridge, EventOutcome, PassiveBus, PassiveHandler,
    PlayerScope, WorldEvent, block_experience, kill_experience,
};
pub use config::{GameConfig, MinionConfig, ProgressionConfig, RewardConfig};
pub use error::{ErrorSeverity, GameError};
pub use minion::{
    ArmyBuff, MinionBrain, MinionCommand, MinionController, MinionRecord, MinionSeed,
    MinionState, army_cap,
};
pub use progression::{
    BaseStats, CurveError, CurveSegment, DerivedKind, ExperienceCurve, LevelUpSummary,
    ProgressionError, ProgressionRecord, SegmentShape, StatAllocation, StatKind,
};
pub use rng::{FixedRng, PcgRng, RngOracle, compute_seed};
pub use skill::{
    Activation, ActivationContext, CatalogError, Precondition, SkillBook, SkillDefinition,
    SkillError, SkillId, SkillInstance, SkillKind, SkillRegistry, SkillScaling, SkillUpgrade,
};
pub use types::{Direction, EntityId, PlayerId, Position, Tick};
pub use world::{
    Corpse, DamageSource, EntitySnapshot, EntityTags, PlayerView, StatusKind, WorldCommand,
    WorldView,
};
