//! Game configuration constants and tunable parameters.
//!
//! Compile-time constants live on [`GameConfig`] directly; everything a
//! balance pass might want to change is grouped into the nested tables so it
//! can be loaded from `config.toml` by the content crate.

use crate::progression::ExperienceCurve;

/// Root balance configuration.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub progression: ProgressionConfig,
    pub minions: MinionConfig,
    pub rewards: RewardConfig,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Stat points granted for every level gained.
    pub const STAT_POINTS_PER_LEVEL: u32 = 5;
    /// Host simulation rate.
    pub const TICKS_PER_SECOND: u64 = 20;
    /// Upper bound on distinct skills a single player can hold.
    pub const MAX_SKILLS: usize = 16;
    /// Lowest allowed player level.
    pub const MIN_LEVEL: u32 = 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Converts whole seconds of game time into ticks.
    pub const fn seconds(seconds: u64) -> u64 {
        seconds * Self::TICKS_PER_SECOND
    }
}

/// Tunables for [`crate::ProgressionRecord`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionConfig {
    pub experience_curve: ExperienceCurve,

    /// Starting value of every base stat.
    pub base_stat: u32,

    pub base_max_health: f32,
    pub health_per_vitality: f32,

    pub base_max_mana: f32,
    pub mana_per_intelligence: f32,

    /// Mana regenerated every `mana_regen_interval` ticks is
    /// `mana_regen_base + intelligence * mana_regen_per_intelligence`.
    pub mana_regen_interval: u64,
    pub mana_regen_base: f32,
    pub mana_regen_per_intelligence: f32,

    pub default_title: String,
    /// Level at which the special title unlocks.
    pub title_unlock_level: u32,
    pub unlocked_title: String,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            experience_curve: ExperienceCurve::default(),
            base_stat: 10,
            base_max_health: 20.0,
            health_per_vitality: 2.0,
            base_max_mana: 100.0,
            mana_per_intelligence: 10.0,
            mana_regen_interval: GameConfig::TICKS_PER_SECOND,
            mana_regen_base: 1.0,
            mana_regen_per_intelligence: 0.2,
            default_title: "Hunter".to_string(),
            title_unlock_level: 40,
            unlocked_title: "Shadow Monarch".to_string(),
        }
    }
}

/// Tunables for [`crate::minion::MinionController`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MinionConfig {
    /// Start moving toward the owner beyond this distance.
    pub follow_start_distance: f64,
    /// Stop moving once within this distance of the owner.
    pub follow_stop_distance: f64,
    /// Ticks between two path/target decisions.
    pub think_interval: u64,
    /// Radius scanned for hostile targets around the minion.
    pub search_radius: f64,
    /// A target further than this from the minion is abandoned.
    pub leash_radius: f64,
    /// Attackers of the owner within this radius of the owner are engaged.
    pub defend_radius: f64,
    /// Ticks an unresolvable owner is tolerated before the minion dissipates.
    pub owner_absent_timeout: u64,
    /// Multiplier applied to damage from non-owner sources. Must be in `[0, 1)`.
    pub damage_mitigation: f32,
    /// Army cap is `army_base + intelligence / army_intelligence_divisor
    /// + army_per_extraction_level * extraction_level`.
    pub army_base: u32,
    pub army_intelligence_divisor: u32,
    pub army_per_extraction_level: u32,
    /// Fraction of the source's health and damage a shadow keeps is
    /// `min(inherit_base + inherit_per_level * extraction_level, inherit_max)`.
    pub inherit_base: f32,
    pub inherit_per_level: f32,
    pub inherit_max: f32,
    /// Speed multiplier is `min(1 + speed_per_level * extraction_level, speed_max)`.
    pub speed_per_level: f32,
    pub speed_max: f32,
}

impl Default for MinionConfig {
    fn default() -> Self {
        Self {
            follow_start_distance: 10.0,
            follow_stop_distance: 3.0,
            think_interval: 10,
            search_radius: 16.0,
            leash_radius: 24.0,
            defend_radius: 12.0,
            owner_absent_timeout: GameConfig::seconds(300),
            damage_mitigation: 0.7,
            army_base: 2,
            army_intelligence_divisor: 10,
            army_per_extraction_level: 2,
            inherit_base: 0.6,
            inherit_per_level: 0.05,
            inherit_max: 1.2,
            speed_per_level: 0.02,
            speed_max: 1.2,
        }
    }
}

/// Tunables for the event bridge reward formulas.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardConfig {
    pub kill_health_factor: f64,
    pub kill_min: f64,
    pub kill_max: f64,
    pub boss_multiplier: f64,
    pub elite_multiplier: f64,
    pub hostile_multiplier: f64,
    /// Victims above this max health raise the kill ceiling.
    pub soft_scaling_threshold: f64,
    /// Ceiling grows by `soft_scaling_factor * sqrt(max_health - threshold)`.
    pub soft_scaling_factor: f64,

    /// Blocks softer than this award nothing.
    pub block_hardness_threshold: f32,
    pub block_hardness_factor: f32,

    /// Health fraction below which the emergency heal passive is evaluated.
    pub low_health_fraction: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            kill_health_factor: 0.8,
            kill_min: 3.0,
            kill_max: 500.0,
            boss_multiplier: 3.0,
            elite_multiplier: 2.0,
            hostile_multiplier: 1.5,
            soft_scaling_threshold: 100.0,
            soft_scaling_factor: 10.0,
            block_hardness_threshold: 3.0,
            block_hardness_factor: 0.3,
            low_health_fraction: 0.3,
        }
    }
}
