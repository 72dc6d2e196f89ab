//! Skill catalog entries.
//!
//! Every skill is a [`SkillDefinition`]: shared metadata plus a [`SkillKind`]
//! variant carrying that kind's own parameters. The set of kinds is closed;
//! adding a behavior means adding a variant and handling it in `effects`.

use std::borrow::Borrow;
use std::fmt;

/// Catalog key of a skill, e.g. `"shadow_extraction"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillId(pub String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SkillId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for SkillId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Level scaling of mana cost and cooldown.
///
/// Both shrink linearly per level above 1 and bottom out at
/// [`SkillScaling::FLOOR`] of their level-1 value. Cooldowns additionally
/// respect `min_cooldown` (itself capped at the base cooldown).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillScaling {
    pub base_cost: f32,
    /// Fraction of `base_cost` removed per level above 1.
    pub cost_reduction: f32,
    /// Cooldown at level 1, in ticks.
    pub base_cooldown: u64,
    /// Fraction of `base_cooldown` removed per level above 1.
    pub cooldown_reduction: f32,
    /// Absolute cooldown floor, in ticks.
    pub min_cooldown: u64,
}

impl Default for SkillScaling {
    fn default() -> Self {
        Self {
            base_cost: 0.0,
            cost_reduction: 0.0,
            base_cooldown: 0,
            cooldown_reduction: 0.0,
            min_cooldown: 0,
        }
    }
}

impl SkillScaling {
    /// Lowest fraction of the level-1 value cost and cooldown may reach.
    pub const FLOOR: f64 = 0.5;

    fn factor(reduction: f32, level: u32) -> f64 {
        let steps = f64::from(level.max(1) - 1);
        (1.0 - f64::from(reduction) * steps).max(Self::FLOOR)
    }

    /// Mana cost at `level`, rounded to hundredths. Level 0 evaluates as level 1.
    pub fn cost(&self, level: u32) -> f32 {
        let raw = f64::from(self.base_cost.max(0.0)) * Self::factor(self.cost_reduction, level);
        ((raw * 100.0).round() / 100.0) as f32
    }

    /// Cooldown in ticks at `level`. Level 0 evaluates as level 1.
    pub fn cooldown(&self, level: u32) -> u64 {
        let raw = (self.base_cooldown as f64 * Self::factor(self.cooldown_reduction, level)).round();
        let floor = self.min_cooldown.min(self.base_cooldown);
        (raw as u64).max(floor)
    }

    pub fn is_valid(&self) -> bool {
        self.base_cost >= 0.0
            && (0.0..1.0).contains(&self.cost_reduction)
            && (0.0..1.0).contains(&self.cooldown_reduction)
    }
}

/// Single-target melee/magic strike on the nearest hostile in range.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikeParams {
    pub base_damage: f32,
    pub damage_per_level: f32,
    /// Bonus damage per point of strength.
    pub strength_scaling: f32,
    pub range: f64,
}

/// Instant displacement along the look direction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashParams {
    pub base_distance: f64,
    pub distance_per_level: f64,
    /// Bonus distance per point of agility.
    pub agility_scaling: f64,
}

/// Area debuff: slows and weakens every hostile around the caster.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BloodlustParams {
    pub radius: f64,
    pub base_duration: u64,
    pub duration_per_level: u64,
    /// Levels needed per extra amplifier step.
    pub levels_per_amplifier: u32,
}

/// Telekinetic push of every hostile around the caster.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthorityParams {
    pub radius: f64,
    pub base_strength: f64,
    pub strength_per_level: f64,
}

/// Temporary damage buff on every minion of the caster.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandParams {
    pub base_bonus: f32,
    pub bonus_per_level: f32,
    pub duration: u64,
}

/// Raise a shadow soldier from a fresh corpse.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractionParams {
    pub range: f64,
    /// Corpses older than this many ticks cannot be extracted.
    pub corpse_window: u64,
    pub base_chance: f64,
    pub chance_per_level: f64,
    pub chance_per_sense: f64,
    pub max_chance: f64,
}

/// Passive: multiplies experience awarded for kills.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsightParams {
    pub bonus_per_level: f64,
    /// Victims with at least this max health grant `high_health_bonus`.
    pub high_health_threshold: f32,
    pub high_health_bonus: f64,
    pub boss_bonus: f64,
}

/// Passive: emergency heal when health drops low. Cooldown comes from the definition's scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecoveryParams {
    pub base_fraction: f32,
    pub fraction_per_level: f32,
    pub max_fraction: f32,
}

/// Passive: cancels harmful status effects.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PurificationParams {
    pub cancel_per_level: f64,
    pub max_cancel: f64,
    pub early_base: f64,
    pub early_per_level: f64,
    pub max_early: f64,
}

/// Closed set of skill behaviors.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillKind {
    Strike(StrikeParams),
    Dash(DashParams),
    Bloodlust(BloodlustParams),
    RulersAuthority(AuthorityParams),
    ShadowCommand(CommandParams),
    Extraction(ExtractionParams),
    HuntersInsight(InsightParams),
    Recovery(RecoveryParams),
    Purification(PurificationParams),
}

impl SkillKind {
    /// Passive kinds never go through the activation protocol.
    pub const fn is_passive(&self) -> bool {
        matches!(
            self,
            SkillKind::HuntersInsight(_) | SkillKind::Recovery(_) | SkillKind::Purification(_)
        )
    }

    pub const fn label(&self) -> &'static str {
        match self {
            SkillKind::Strike(_) => "strike",
            SkillKind::Dash(_) => "dash",
            SkillKind::Bloodlust(_) => "bloodlust",
            SkillKind::RulersAuthority(_) => "rulers_authority",
            SkillKind::ShadowCommand(_) => "shadow_command",
            SkillKind::Extraction(_) => "extraction",
            SkillKind::HuntersInsight(_) => "hunters_insight",
            SkillKind::Recovery(_) => "recovery",
            SkillKind::Purification(_) => "purification",
        }
    }
}

/// A catalog entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Player level required before the first point can be spent.
    pub unlock_level: u32,
    pub max_level: u32,
    /// Usable at level 1 without spending a point.
    #[cfg_attr(feature = "serde", serde(default))]
    pub innate: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling: SkillScaling,
    pub kind: SkillKind,
}

impl SkillDefinition {
    pub fn is_passive(&self) -> bool {
        self.kind.is_passive()
    }

    /// Mana cost at `level`.
    pub fn cost(&self, level: u32) -> f32 {
        self.scaling.cost(level)
    }

    /// Cooldown in ticks at `level`.
    pub fn cooldown(&self, level: u32) -> u64 {
        self.scaling.cooldown(level)
    }

    /// Headline number of the skill at `level`, before stat bonuses.
    ///
    /// Damage for strikes, distance for dashes, ticks for debuffs, push
    /// strength, buff multiplier, extraction chance, experience multiplier,
    /// heal fraction or cancel chance depending on the kind.
    pub fn effect_magnitude(&self, level: u32) -> f64 {
        let steps = f64::from(level.max(1) - 1);
        match &self.kind {
            SkillKind::Strike(p) => f64::from(p.base_damage) + f64::from(p.damage_per_level) * steps,
            SkillKind::Dash(p) => p.base_distance + p.distance_per_level * steps,
            SkillKind::Bloodlust(p) => (p.base_duration as f64) + (p.duration_per_level as f64) * steps,
            SkillKind::RulersAuthority(p) => p.base_strength + p.strength_per_level * steps,
            SkillKind::ShadowCommand(p) => {
                1.0 + f64::from(p.base_bonus) + f64::from(p.bonus_per_level) * steps
            }
            SkillKind::Extraction(p) => {
                (p.base_chance + p.chance_per_level * steps).min(p.max_chance)
            }
            SkillKind::HuntersInsight(p) => 1.0 + p.bonus_per_level * f64::from(level),
            SkillKind::Recovery(p) => f64::from(p.heal_fraction(level)),
            SkillKind::Purification(p) => p.cancel_chance(level),
        }
    }
}

impl InsightParams {
    /// Experience multiplier for a kill at `level`.
    pub fn multiplier(&self, level: u32, victim_max_health: f32, boss: bool) -> f64 {
        let mut multiplier = 1.0 + self.bonus_per_level * f64::from(level);
        if victim_max_health >= self.high_health_threshold {
            multiplier += self.high_health_bonus;
        }
        if boss {
            multiplier += self.boss_bonus;
        }
        multiplier
    }
}

impl RecoveryParams {
    /// Fraction of max health restored at `level`.
    pub fn heal_fraction(&self, level: u32) -> f32 {
        let steps = level.max(1) - 1;
        (self.base_fraction + self.fraction_per_level * steps as f32).min(self.max_fraction)
    }
}

impl PurificationParams {
    /// Probability of cancelling a harmful effect as it is applied.
    pub fn cancel_chance(&self, level: u32) -> f64 {
        (self.cancel_per_level * f64::from(level)).min(self.max_cancel)
    }

    /// Probability of reporting an early removal when a harmful effect expires.
    pub fn early_removal_chance(&self, level: u32) -> f64 {
        (self.early_base + self.early_per_level * f64::from(level)).min(self.max_early)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaling() -> SkillScaling {
        SkillScaling {
            base_cost: 100.0,
            cost_reduction: 0.05,
            base_cooldown: 200,
            cooldown_reduction: 0.08,
            min_cooldown: 40,
        }
    }

    #[test]
    fn cost_at_level_three_is_ninety() {
        assert_eq!(scaling().cost(3), 90.0);
    }

    #[test]
    fn level_zero_evaluates_as_level_one() {
        assert_eq!(scaling().cost(0), scaling().cost(1));
        assert_eq!(scaling().cooldown(0), scaling().cooldown(1));
    }

    #[test]
    fn cost_and_cooldown_monotonic_with_floor() {
        let s = scaling();
        for level in 1..100 {
            assert!(s.cost(level + 1) <= s.cost(level));
            assert!(s.cooldown(level + 1) <= s.cooldown(level));
            assert!(s.cost(level) >= 50.0);
            assert!(s.cooldown(level) >= 100);
        }
        assert_eq!(s.cost(99), 50.0);
        assert_eq!(s.cooldown(99), 100);
    }

    #[test]
    fn absolute_cooldown_floor_never_exceeds_base() {
        let s = SkillScaling {
            base_cooldown: 30,
            min_cooldown: 100,
            cooldown_reduction: 0.1,
            ..SkillScaling::default()
        };
        assert_eq!(s.cooldown(1), 30);
        assert_eq!(s.cooldown(20), 30);
    }

    #[test]
    fn purification_chances_are_capped() {
        let p = PurificationParams {
            cancel_per_level: 0.1,
            max_cancel: 0.75,
            early_base: 0.1,
            early_per_level: 0.05,
            max_early: 0.5,
        };
        assert!((p.cancel_chance(3) - 0.3).abs() < 1e-9);
        assert_eq!(p.cancel_chance(20), 0.75);
        assert_eq!(p.early_removal_chance(50), 0.5);
    }

    #[test]
    fn insight_multiplier_bonuses() {
        let p = InsightParams {
            bonus_per_level: 0.1,
            high_health_threshold: 100.0,
            high_health_bonus: 0.25,
            boss_bonus: 0.5,
        };
        assert!((p.multiplier(2, 20.0, false) - 1.2).abs() < 1e-9);
        assert!((p.multiplier(2, 150.0, true) - 1.95).abs() < 1e-9);
    }
}
