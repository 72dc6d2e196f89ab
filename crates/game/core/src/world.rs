//! Read-only view of the host world and the commands the core hands back.
//!
//! The host engine owns every entity, their physics and damage resolution.
//! Core logic sees the world only through [`WorldView`] and expresses every
//! world-side consequence as a [`WorldCommand`] for the host to apply. A
//! rejected skill or a skipped AI tick therefore never touches the world.

use bitflags::bitflags;
use strum::{Display, EnumIter, EnumString};

use crate::types::{Direction, EntityId, PlayerId, Position, Tick};

bitflags! {
    /// Classification flags the host attaches to an entity.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EntityTags: u16 {
        /// Attacks players on sight.
        const HOSTILE = 1 << 0;
        /// A player body.
        const PLAYER = 1 << 1;
        /// A shadow soldier (see `owner`).
        const MINION = 1 << 2;
        /// Tagged by the host as a boss encounter.
        const BOSS = 1 << 3;
        /// Tagged by the host as an elite mob.
        const ELITE = 1 << 4;
    }
}

/// Snapshot of a live entity taken for one decision.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySnapshot {
    pub id: EntityId,
    /// Registry identifier, e.g. `"minecraft:zombie"`.
    pub archetype: String,
    pub position: Position,
    pub health: f32,
    pub max_health: f32,
    pub attack_damage: f32,
    pub speed: f32,
    pub alive: bool,
    pub tags: EntityTags,
    /// Owning player for minions.
    pub owner: Option<PlayerId>,
}

impl EntitySnapshot {
    pub fn is_hostile(&self) -> bool {
        self.tags.contains(EntityTags::HOSTILE)
    }

    pub fn is_minion_of(&self, player: PlayerId) -> bool {
        self.tags.contains(EntityTags::MINION) && self.owner == Some(player)
    }
}

/// A resolved, online player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerView {
    pub id: PlayerId,
    pub entity: EntityId,
    pub position: Position,
    pub look: Direction,
    pub health: f32,
    pub max_health: f32,
}

/// A recently killed entity that can still be extracted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Corpse {
    pub entity: EntityId,
    pub archetype: String,
    pub position: Position,
    pub max_health: f32,
    pub attack_damage: f32,
    pub speed: f32,
    pub died_at: Tick,
}

/// Status effect kinds the core reasons about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    Poison,
    Wither,
    Weakness,
    Slowness,
    Blindness,
    Nausea,
    MiningFatigue,
    Hunger,
    Darkness,
    Speed,
    Strength,
    Regeneration,
    Resistance,
}

impl StatusKind {
    /// Allow-list of effects the purification passive may cancel.
    pub const fn is_harmful(self) -> bool {
        matches!(
            self,
            StatusKind::Poison
                | StatusKind::Wither
                | StatusKind::Weakness
                | StatusKind::Slowness
                | StatusKind::Blindness
                | StatusKind::Nausea
                | StatusKind::MiningFatigue
                | StatusKind::Hunger
                | StatusKind::Darkness
        )
    }
}

/// Who dealt a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageSource {
    Player(PlayerId),
    Entity(EntityId),
    /// Falls, fire, drowning and other sourceless damage.
    Environment,
}

/// Host-side queries the core needs.
pub trait WorldView {
    /// Resolves a player identifier to an online player, if any.
    fn player(&self, id: PlayerId) -> Option<PlayerView>;

    /// Looks up a loaded entity.
    fn entity(&self, id: EntityId) -> Option<EntitySnapshot>;

    /// Living entities within `radius` of `center`.
    fn entities_near(&self, center: &Position, radius: f64) -> Vec<EntitySnapshot>;

    /// Extractable corpses within `radius` of `center`.
    fn corpses_near(&self, _center: &Position, _radius: f64) -> Vec<Corpse> {
        Vec::new()
    }
}

/// A world-side consequence the host must apply.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldCommand {
    /// Deal damage to an entity on behalf of a player.
    Damage {
        target: EntityId,
        amount: f32,
        source: PlayerId,
    },
    /// Move an entity instantly.
    Teleport { entity: EntityId, to: Position },
    /// Push an entity along a direction.
    Knockback {
        target: EntityId,
        direction: Direction,
        strength: f64,
    },
    /// Apply a status effect.
    ApplyStatus {
        target: EntityId,
        status: StatusKind,
        duration: u64,
        amplifier: u8,
    },
    /// Heal a player body.
    Heal { player: PlayerId, amount: f32 },
    /// Remove a status from a player.
    RemoveStatus { player: PlayerId, status: StatusKind },
    /// Push a recomputed max health to a player body.
    SetMaxHealth { player: PlayerId, value: f32 },
    /// Consume a corpse that was turned into a shadow.
    ConsumeCorpse { entity: EntityId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn beneficial_effects_are_not_harmful() {
        let harmful: Vec<_> = StatusKind::iter().filter(|s| s.is_harmful()).collect();
        assert_eq!(harmful.len(), 9);
        assert!(!StatusKind::Regeneration.is_harmful());
        assert!(!StatusKind::Speed.is_harmful());
    }

    #[test]
    fn minion_ownership() {
        let snapshot = EntitySnapshot {
            id: EntityId(3),
            archetype: "shadow".into(),
            position: Position::ORIGIN,
            health: 10.0,
            max_health: 10.0,
            attack_damage: 1.0,
            speed: 0.3,
            alive: true,
            tags: EntityTags::MINION,
            owner: Some(PlayerId(1)),
        };
        assert!(snapshot.is_minion_of(PlayerId(1)));
        assert!(!snapshot.is_minion_of(PlayerId(2)));
        assert!(!snapshot.is_hostile());
    }
}
