//! Per-player progression record.
//!
//! One record exists per player on the authoritative side. Observers hold a
//! mirrored copy that is overwritten by snapshots. Every mutating method here
//! leaves the record "dirty"; flushing the mirror is the caller's job.

use crate::config::{GameConfig, ProgressionConfig};
use crate::types::Tick;

use super::error::ProgressionError;
use super::stats::{BaseStats, DerivedKind, StatKind};

/// Level, experience, stat points, base stats and the mana pool of one player.
///
/// Invariants (hold after every public method returns):
/// - `level >= 1`
/// - `experience < experience_to_next`
/// - `0 <= mana <= max_mana`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionRecord {
    level: u32,
    experience: u64,
    experience_to_next: u64,
    stat_points: u32,
    stats: BaseStats,
    mana: f32,
    max_mana: f32,
    title: String,
    monarch_unlocked: bool,
    last_message: String,
    last_message_at: Tick,
}

/// Result of an [`ProgressionRecord::add_experience`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelUpSummary {
    pub levels_gained: u32,
    pub new_level: u32,
    pub stat_points_granted: u32,
    /// The special title unlocked during this call.
    pub title_unlocked: bool,
}

impl LevelUpSummary {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Result of a successful stat allocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatAllocation {
    pub stat: StatKind,
    pub new_value: u32,
    /// Derived value that was recomputed, with its new maximum.
    pub derived: Option<(DerivedKind, f32)>,
}

impl ProgressionRecord {
    /// Fresh record for a player that first joins the host.
    pub fn new(config: &ProgressionConfig) -> Self {
        let stats = BaseStats::uniform(config.base_stat);
        let max_mana = Self::derive_max_mana(config, &stats);
        Self {
            level: GameConfig::MIN_LEVEL,
            experience: 0,
            experience_to_next: config.experience_curve.required(GameConfig::MIN_LEVEL),
            stat_points: 0,
            stats,
            mana: max_mana,
            max_mana,
            title: config.default_title.clone(),
            monarch_unlocked: false,
            last_message: String::new(),
            last_message_at: Tick::ZERO,
        }
    }

    // ===== accessors =====

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn experience_to_next(&self) -> u64 {
        self.experience_to_next
    }

    pub fn stat_points(&self) -> u32 {
        self.stat_points
    }

    pub fn stats(&self) -> &BaseStats {
        &self.stats
    }

    pub fn stat(&self, kind: StatKind) -> u32 {
        self.stats.get(kind)
    }

    pub fn mana(&self) -> f32 {
        self.mana
    }

    pub fn max_mana(&self) -> f32 {
        self.max_mana
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn monarch_unlocked(&self) -> bool {
        self.monarch_unlocked
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    pub fn last_message_at(&self) -> Tick {
        self.last_message_at
    }

    /// Maximum health derived from vitality. The host applies it to the player body.
    pub fn max_health(&self, config: &ProgressionConfig) -> f32 {
        Self::derive_max_health(config, &self.stats)
    }

    // ===== gameplay transitions =====

    /// Adds experience and settles any resulting level-ups.
    pub fn add_experience(
        &mut self,
        config: &ProgressionConfig,
        amount: u64,
        now: Tick,
    ) -> LevelUpSummary {
        self.experience = self.experience.saturating_add(amount);

        let mut summary = LevelUpSummary {
            new_level: self.level,
            ..LevelUpSummary::default()
        };

        while self.experience >= self.experience_to_next {
            self.experience -= self.experience_to_next;
            self.level = self.level.saturating_add(1);
            self.experience_to_next = config.experience_curve.required(self.level);
            self.stat_points = self
                .stat_points
                .saturating_add(GameConfig::STAT_POINTS_PER_LEVEL);

            summary.levels_gained += 1;
            summary.stat_points_granted += GameConfig::STAT_POINTS_PER_LEVEL;
        }
        summary.new_level = self.level;

        if summary.leveled_up() {
            self.post_message(format!("Level up! You are now level {}.", self.level), now);
        }
        if !self.monarch_unlocked && self.level >= config.title_unlock_level {
            self.monarch_unlocked = true;
            self.title = config.unlocked_title.clone();
            self.post_message(format!("Title unlocked: {}", self.title), now);
            summary.title_unlocked = true;
        }

        summary
    }

    /// Spends one stat point on the stat named `name`.
    pub fn allocate_stat_point(
        &mut self,
        config: &ProgressionConfig,
        name: &str,
    ) -> Result<StatAllocation, ProgressionError> {
        let stat: StatKind = name
            .trim()
            .parse()
            .map_err(|_| ProgressionError::UnknownStat(name.to_string()))?;
        self.allocate(config, stat)
    }

    /// Spends one stat point on `stat`, recomputing the derived value it feeds.
    pub fn allocate(
        &mut self,
        config: &ProgressionConfig,
        stat: StatKind,
    ) -> Result<StatAllocation, ProgressionError> {
        if self.stat_points == 0 {
            return Err(ProgressionError::NoStatPoints);
        }

        self.stat_points -= 1;
        let value = self.stats.get_mut(stat);
        *value = value.saturating_add(1);
        let new_value = *value;

        let derived = stat.derived().map(|kind| match kind {
            DerivedKind::MaxHealth => (kind, self.max_health(config)),
            DerivedKind::MaxMana => {
                self.recompute_max_mana(config);
                (kind, self.max_mana)
            }
        });

        Ok(StatAllocation {
            stat,
            new_value,
            derived,
        })
    }

    /// Spends mana. Fails without change if the pool holds less than `amount`.
    pub fn consume_resource(&mut self, amount: f32) -> Result<(), ProgressionError> {
        let amount = amount.max(0.0);
        if self.mana < amount {
            return Err(ProgressionError::InsufficientResource {
                required: amount,
                available: self.mana,
            });
        }
        self.mana -= amount;
        Ok(())
    }

    /// Puts back a spend exactly as it was before `consume_resource`.
    pub(crate) fn refund_resource(&mut self, before: f32) {
        self.mana = before.clamp(0.0, self.max_mana);
    }

    /// Spends one unspent point on something other than a stat (skill levels).
    pub fn spend_stat_point(&mut self) -> Result<(), ProgressionError> {
        if self.stat_points == 0 {
            return Err(ProgressionError::NoStatPoints);
        }
        self.stat_points -= 1;
        Ok(())
    }

    /// Restores mana, clamped to the maximum.
    pub fn regenerate_resource(&mut self, amount: f32) {
        self.mana = (self.mana + amount.max(0.0)).min(self.max_mana);
    }

    /// Mana restored per regeneration interval at the current intelligence.
    pub fn regeneration_rate(&self, config: &ProgressionConfig) -> f32 {
        config.mana_regen_base
            + self.stats.intelligence as f32 * config.mana_regen_per_intelligence
    }

    /// Sets the last system message shown to the player.
    pub fn post_message(&mut self, message: impl Into<String>, now: Tick) {
        self.last_message = message.into();
        self.last_message_at = now;
    }

    // ===== admin setters (reset/debug only) =====

    /// Sets the level (floored at 1); experience is clamped below the new threshold.
    pub fn set_level(&mut self, config: &ProgressionConfig, level: u32) {
        self.level = level.max(GameConfig::MIN_LEVEL);
        self.experience_to_next = config.experience_curve.required(self.level);
        self.experience = self.experience.min(self.experience_to_next - 1);
    }

    /// Sets experience within the current level, clamped below the threshold.
    pub fn set_experience(&mut self, experience: u64) {
        self.experience = experience.min(self.experience_to_next - 1);
    }

    pub fn set_stat_points(&mut self, points: u32) {
        self.stat_points = points;
    }

    pub fn set_stat(&mut self, config: &ProgressionConfig, stat: StatKind, value: u32) {
        *self.stats.get_mut(stat) = value;
        if stat == StatKind::Intelligence {
            self.recompute_max_mana(config);
        }
    }

    /// Sets current mana, clamped to `[0, max_mana]`.
    pub fn set_resource(&mut self, mana: f32) {
        self.mana = mana.clamp(0.0, self.max_mana);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_monarch_unlocked(&mut self, unlocked: bool) {
        self.monarch_unlocked = unlocked;
    }

    /// Rewinds the record to a fresh state.
    pub fn reset(&mut self, config: &ProgressionConfig) {
        *self = Self::new(config);
    }

    /// Rebuilds a record from persisted fields, re-establishing the invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        config: &ProgressionConfig,
        level: u32,
        experience: u64,
        stat_points: u32,
        stats: BaseStats,
        mana: f32,
        title: String,
        monarch_unlocked: bool,
        last_message: String,
        last_message_at: Tick,
    ) -> Self {
        let mut record = Self::new(config);
        record.stats = stats;
        record.recompute_max_mana(config);
        record.set_level(config, level);
        record.set_experience(experience);
        record.stat_points = stat_points;
        record.set_resource(mana);
        record.title = title;
        record.monarch_unlocked = monarch_unlocked;
        record.last_message = last_message;
        record.last_message_at = last_message_at;
        record
    }

    // ===== derived values =====

    fn recompute_max_mana(&mut self, config: &ProgressionConfig) {
        self.max_mana = Self::derive_max_mana(config, &self.stats);
        self.mana = self.mana.min(self.max_mana);
    }

    fn derive_max_mana(config: &ProgressionConfig, stats: &BaseStats) -> f32 {
        let delta = stats.intelligence as f32 - config.base_stat as f32;
        (config.base_max_mana + delta * config.mana_per_intelligence).max(0.0)
    }

    fn derive_max_health(config: &ProgressionConfig, stats: &BaseStats) -> f32 {
        let delta = stats.vitality as f32 - config.base_stat as f32;
        (config.base_max_health + delta * config.health_per_vitality).max(1.0)
    }
}
