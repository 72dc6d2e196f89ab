//! Shadow soldier data: what a minion inherited and how strong the army may get.

use crate::config::MinionConfig;
use crate::types::{EntityId, PlayerId, Position, Tick};
use crate::world::{Corpse, DamageSource};

/// Everything needed to raise a shadow, captured at extraction time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinionSeed {
    pub owner: PlayerId,
    pub corpse: EntityId,
    pub source_archetype: String,
    pub source_max_health: f32,
    pub source_damage: f32,
    pub source_speed: f32,
    pub position: Position,
    pub extraction_level: u32,
}

impl MinionSeed {
    pub fn from_corpse(owner: PlayerId, corpse: &Corpse, extraction_level: u32) -> Self {
        Self {
            owner,
            corpse: corpse.entity,
            source_archetype: corpse.archetype.clone(),
            source_max_health: corpse.max_health,
            source_damage: corpse.attack_damage,
            source_speed: corpse.speed,
            position: corpse.position,
            extraction_level,
        }
    }
}

/// A live shadow soldier.
///
/// Inherited values are fixed at creation; [`MinionRecord::inherit`] derives
/// them again from the same seed and config.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinionRecord {
    pub id: EntityId,
    pub owner: PlayerId,
    pub source_archetype: String,
    pub inherited_health: f32,
    pub inherited_damage: f32,
    pub inherited_speed: f32,
    /// Re-resolved through the world every think; never trusted to be alive.
    pub current_target: Option<EntityId>,
    pub spawned_at: Tick,
}

impl MinionRecord {
    pub fn inherit(id: EntityId, seed: &MinionSeed, config: &MinionConfig, now: Tick) -> Self {
        let level = seed.extraction_level as f32;
        let share = (config.inherit_base + config.inherit_per_level * level).min(config.inherit_max);
        let speed = (1.0 + config.speed_per_level * level).min(config.speed_max);
        Self {
            id,
            owner: seed.owner,
            source_archetype: seed.source_archetype.clone(),
            inherited_health: (seed.source_max_health * share).max(1.0),
            inherited_damage: (seed.source_damage * share).max(0.0),
            inherited_speed: (seed.source_speed * speed).max(0.0),
            current_target: None,
            spawned_at: now,
        }
    }

    /// Damage actually applied to this minion for a hit of `amount`.
    ///
    /// Hits from the owner are ignored; everything else is mitigated.
    pub fn incoming_damage(&self, config: &MinionConfig, source: DamageSource, amount: f32) -> f32 {
        if source == DamageSource::Player(self.owner) {
            return 0.0;
        }
        amount.max(0.0) * config.damage_mitigation
    }
}

/// Temporary damage multiplier granted to every minion of a player.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmyBuff {
    pub damage_multiplier: f32,
    pub until: Tick,
}

impl ArmyBuff {
    pub fn is_active(&self, now: Tick) -> bool {
        now < self.until
    }
}

/// Maximum number of shadows a player may keep.
pub fn army_cap(config: &MinionConfig, intelligence: u32, extraction_level: u32) -> u32 {
    let divisor = config.army_intelligence_divisor.max(1);
    config.army_base + intelligence / divisor + config.army_per_extraction_level * extraction_level
}
