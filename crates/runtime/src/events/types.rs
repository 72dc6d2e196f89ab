//! Event types for different topics.

use monarch_core::{EntityId, PlayerId, SkillId, StatKind, Tick};
use serde::{Deserialize, Serialize};

/// Changes to a player's progression record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgressionEvent {
    ExperienceGained {
        player: PlayerId,
        amount: u64,
        /// World event kind that produced the award, e.g. `"entity_killed"`.
        source: String,
        at: Tick,
    },
    LevelUp {
        player: PlayerId,
        new_level: u32,
        levels_gained: u32,
        at: Tick,
    },
    TitleUnlocked {
        player: PlayerId,
        title: String,
    },
    StatAllocated {
        player: PlayerId,
        stat: StatKind,
        new_value: u32,
    },
}

/// Skill activations, rejections, upgrades and passive triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkillEvent {
    Activated {
        player: PlayerId,
        skill: SkillId,
        level: u32,
        cost: f32,
        at: Tick,
    },
    /// A request was refused; `code` is the stable error identifier.
    Rejected {
        player: PlayerId,
        skill: SkillId,
        code: String,
        at: Tick,
    },
    Upgraded {
        player: PlayerId,
        skill: SkillId,
        new_level: u32,
    },
    PassiveTriggered {
        player: PlayerId,
        passive: String,
        at: Tick,
    },
}

/// Shadow soldier lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MinionEvent {
    Spawned {
        owner: PlayerId,
        minion: EntityId,
        archetype: String,
        at: Tick,
    },
    /// The extraction roll failed; mana and cooldown were still spent.
    ExtractionFizzled { owner: PlayerId, at: Tick },
    Dissipated {
        owner: PlayerId,
        minion: EntityId,
        at: Tick,
    },
    /// Killed or unloaded by the host.
    Removed { owner: PlayerId, minion: EntityId },
}
