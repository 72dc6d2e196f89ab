//! Experience reward formulas.

use std::collections::BTreeSet;

use crate::config::RewardConfig;
use crate::world::{EntitySnapshot, EntityTags};

/// Reward tier of a killed entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityTier {
    Boss,
    Elite,
    Hostile,
    Passive,
}

impl EntityTier {
    pub fn multiplier(self, rewards: &RewardConfig) -> f64 {
        match self {
            EntityTier::Boss => rewards.boss_multiplier,
            EntityTier::Elite => rewards.elite_multiplier,
            EntityTier::Hostile => rewards.hostile_multiplier,
            EntityTier::Passive => 1.0,
        }
    }
}

/// Archetype sets that promote an entity to boss or elite.
///
/// Host tags (`BOSS`, `ELITE`) are honored as well, so modded bosses the
/// lists do not know about still classify correctly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntityClassifier {
    pub bosses: BTreeSet<String>,
    pub elites: BTreeSet<String>,
}

impl EntityClassifier {
    pub fn new<I, J>(bosses: I, elites: J) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
    {
        Self {
            bosses: bosses.into_iter().map(Into::into).collect(),
            elites: elites.into_iter().map(Into::into).collect(),
        }
    }

    pub fn classify(&self, entity: &EntitySnapshot) -> EntityTier {
        if entity.tags.contains(EntityTags::BOSS) || self.bosses.contains(&entity.archetype) {
            EntityTier::Boss
        } else if entity.tags.contains(EntityTags::ELITE) || self.elites.contains(&entity.archetype)
        {
            EntityTier::Elite
        } else if entity.is_hostile() {
            EntityTier::Hostile
        } else {
            EntityTier::Passive
        }
    }

    pub fn is_boss(&self, entity: &EntitySnapshot) -> bool {
        self.classify(entity) == EntityTier::Boss
    }
}

/// Experience for a kill, before passive multipliers.
///
/// `max_health * kill_health_factor * tier`, clamped to
/// `[kill_min, kill_max + soft term]` where the soft term grows with the
/// square root of the health above `soft_scaling_threshold`.
pub fn kill_experience(max_health: f32, tier: EntityTier, rewards: &RewardConfig) -> u64 {
    let health = f64::from(max_health.max(0.0));
    let base = health * rewards.kill_health_factor * tier.multiplier(rewards);
    let excess = health - rewards.soft_scaling_threshold;
    let ceiling = if excess > 0.0 {
        rewards.kill_max + rewards.soft_scaling_factor * excess.sqrt()
    } else {
        rewards.kill_max
    };
    base.clamp(rewards.kill_min, ceiling.max(rewards.kill_min)).round() as u64
}

/// Experience for breaking a block; soft blocks award nothing.
pub fn block_experience(hardness: f32, rewards: &RewardConfig) -> u64 {
    if hardness.is_nan() || hardness < rewards.block_hardness_threshold {
        return 0;
    }
    ((hardness * rewards.block_hardness_factor).floor() as u64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntityId, Position};

    fn victim(archetype: &str, max_health: f32, tags: EntityTags) -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId(1),
            archetype: archetype.into(),
            position: Position::ORIGIN,
            health: 0.0,
            max_health,
            attack_damage: 0.0,
            speed: 0.0,
            alive: false,
            tags,
            owner: None,
        }
    }

    #[test]
    fn boss_with_200_health_awards_480() {
        let rewards = RewardConfig::default();
        let classifier = EntityClassifier::new(["minecraft:wither"], Vec::<String>::new());
        let boss = victim("minecraft:wither", 200.0, EntityTags::HOSTILE);
        let tier = classifier.classify(&boss);
        assert_eq!(tier, EntityTier::Boss);
        assert_eq!(kill_experience(boss.max_health, tier, &rewards), 480);
    }

    #[test]
    fn kill_rewards_are_clamped() {
        let rewards = RewardConfig::default();
        assert_eq!(kill_experience(1.0, EntityTier::Passive, &rewards), 3);
        assert_eq!(kill_experience(20.0, EntityTier::Hostile, &rewards), 24);
        // 400 * 0.8 * 3 = 960, ceiling 500 + 10 * sqrt(300) ≈ 673
        assert_eq!(kill_experience(400.0, EntityTier::Boss, &rewards), 673);
        assert_eq!(kill_experience(100.0, EntityTier::Boss, &rewards), 240);
    }

    #[test]
    fn tags_classify_without_lists() {
        let classifier = EntityClassifier::default();
        assert_eq!(
            classifier.classify(&victim("mod:titan", 300.0, EntityTags::BOSS)),
            EntityTier::Boss
        );
        assert_eq!(
            classifier.classify(&victim("minecraft:cow", 10.0, EntityTags::empty())),
            EntityTier::Passive
        );
    }

    #[test]
    fn block_rewards() {
        let rewards = RewardConfig::default();
        assert_eq!(block_experience(1.5, &rewards), 0);
        assert_eq!(block_experience(3.0, &rewards), 1);
        assert_eq!(block_experience(50.0, &rewards), 15);
        assert_eq!(block_experience(f32::NAN, &rewards), 0);
    }
}
