//! Passive skill handlers and the bus that runs them.
//!
//! Handlers are registered explicitly and run in priority order (lower
//! first). Each handler looks up the catalog entries of its own
//! [`SkillKind`] and does nothing for players who have not learned them.

use std::sync::Arc;

use crate::config::RewardConfig;
use crate::rng::{RngOracle, compute_seed, roll};
use crate::skill::{SkillBook, SkillDefinition, SkillKind, SkillRegistry};
use crate::types::{PlayerId, Tick};

use super::event::{EventOutcome, WorldEvent};
use super::rewards::EntityClassifier;

/// Per-player state a dispatch may read or stamp.
pub struct PlayerScope<'a> {
    pub player: PlayerId,
    pub registry: &'a SkillRegistry,
    pub book: &'a mut SkillBook,
    pub rng: &'a dyn RngOracle,
    pub session_seed: u64,
    pub now: Tick,
}

/// What a handler sees while applying.
pub struct PassiveContext<'a, 'b> {
    pub scope: &'b mut PlayerScope<'a>,
    pub classifier: &'b EntityClassifier,
    pub rewards: &'b RewardConfig,
}

impl PassiveContext<'_, '_> {
    /// Learned definitions matching `kind`, with the player's effective level.
    fn learned<'r>(
        &self,
        registry: &'r SkillRegistry,
        kind: impl Fn(&SkillKind) -> bool,
    ) -> Vec<(&'r SkillDefinition, u32)> {
        registry
            .passives()
            .filter(|def| kind(&def.kind))
            .map(|def| (def, self.scope.book.level_of(def)))
            .filter(|(_, level)| *level > 0)
            .collect()
    }

    fn seed(&self, context: u32) -> u64 {
        compute_seed(
            self.scope.session_seed,
            self.scope.now.0,
            self.scope.player.0,
            context,
        )
    }
}

/// A passive reaction to world events.
pub trait PassiveHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    /// Cheap pre-filter on the event shape.
    fn should_trigger(&self, event: &WorldEvent) -> bool;

    /// Applies the passive. Returns `true` if it changed the outcome.
    fn apply(
        &self,
        event: &WorldEvent,
        ctx: &mut PassiveContext<'_, '_>,
        outcome: &mut EventOutcome,
    ) -> bool;
}

/// Priority-ordered passive handlers.
#[derive(Clone, Default)]
pub struct PassiveBus {
    handlers: Vec<Arc<dyn PassiveHandler>>,
}

impl PassiveBus {
    pub fn new(mut handlers: Vec<Arc<dyn PassiveHandler>>) -> Self {
        handlers.sort_by_key(|h| h.priority());
        Self { handlers }
    }

    /// Insight, recovery and purification.
    pub fn standard() -> Self {
        Self::new(vec![
            Arc::new(InsightHandler) as Arc<dyn PassiveHandler>,
            Arc::new(RecoveryHandler) as Arc<dyn PassiveHandler>,
            Arc::new(PurificationHandler) as Arc<dyn PassiveHandler>,
        ])
    }

    /// Adds a handler, keeping priority order. Equal priorities keep insertion order.
    pub fn register(&mut self, handler: Arc<dyn PassiveHandler>) {
        let at = self
            .handlers
            .partition_point(|h| h.priority() <= handler.priority());
        self.handlers.insert(at, handler);
    }

    pub fn find(&self, name: &str) -> Option<&Arc<dyn PassiveHandler>> {
        self.handlers.iter().find(|h| h.name() == name)
    }

    /// Handler names and priorities in execution order.
    pub fn handlers(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.handlers.iter().map(|h| (h.name(), h.priority()))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn run(
        &self,
        event: &WorldEvent,
        ctx: &mut PassiveContext<'_, '_>,
        outcome: &mut EventOutcome,
    ) {
        for handler in &self.handlers {
            if handler.should_trigger(event) && handler.apply(event, ctx, outcome) {
                outcome.triggered.push(handler.name());
            }
        }
    }
}

/// Scales kill experience.
pub struct InsightHandler;

impl PassiveHandler for InsightHandler {
    fn name(&self) -> &'static str {
        "hunters_insight"
    }

    fn priority(&self) -> i32 {
        -10
    }

    fn should_trigger(&self, event: &WorldEvent) -> bool {
        matches!(event, WorldEvent::EntityKilled { .. })
    }

    fn apply(
        &self,
        event: &WorldEvent,
        ctx: &mut PassiveContext<'_, '_>,
        outcome: &mut EventOutcome,
    ) -> bool {
        let WorldEvent::EntityKilled { victim, .. } = event else {
            return false;
        };
        if outcome.experience == 0 {
            return false;
        }
        let boss = ctx.classifier.is_boss(victim);
        let registry = ctx.scope.registry;
        let mut multiplier = 1.0;
        let mut learned = false;
        for (def, level) in ctx.learned(registry, |k| matches!(k, SkillKind::HuntersInsight(_))) {
            if let SkillKind::HuntersInsight(p) = &def.kind {
                multiplier *= p.multiplier(level, victim.max_health, boss);
                learned = true;
            }
        }
        if !learned {
            return false;
        }
        outcome.experience = (outcome.experience as f64 * multiplier).round() as u64;
        true
    }
}

/// Emergency heal when a hit leaves the player low.
pub struct RecoveryHandler;

impl PassiveHandler for RecoveryHandler {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn should_trigger(&self, event: &WorldEvent) -> bool {
        matches!(event, WorldEvent::PlayerDamaged { .. })
    }

    fn apply(
        &self,
        event: &WorldEvent,
        ctx: &mut PassiveContext<'_, '_>,
        outcome: &mut EventOutcome,
    ) -> bool {
        let WorldEvent::PlayerDamaged {
            health_after,
            max_health,
            ..
        } = event
        else {
            return false;
        };
        if *max_health <= 0.0 || *health_after <= 0.0 || outcome.heal.is_some() {
            return false;
        }
        if health_after / max_health >= ctx.rewards.low_health_fraction {
            return false;
        }

        let registry = ctx.scope.registry;
        let now = ctx.scope.now;
        for (def, level) in ctx.learned(registry, |k| matches!(k, SkillKind::Recovery(_))) {
            let SkillKind::Recovery(p) = &def.kind else {
                continue;
            };
            let Ok(instance) = ctx.scope.book.entry(&def.id) else {
                continue;
            };
            if !instance.is_ready(def, now) {
                continue;
            }
            instance.last_activated_at = Some(now);
            let amount = max_health * p.heal_fraction(level);
            outcome.heal = Some(amount);
            outcome
                .notices
                .push(format!("{} restored {amount:.1} health.", def.name));
            return true;
        }
        false
    }
}

/// Cancels harmful statuses and reports early removals.
pub struct PurificationHandler;

impl PassiveHandler for PurificationHandler {
    fn name(&self) -> &'static str {
        "purification"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn should_trigger(&self, event: &WorldEvent) -> bool {
        match event {
            WorldEvent::StatusApplied { status, .. } | WorldEvent::StatusExpired { status, .. } => {
                status.is_harmful()
            }
            _ => false,
        }
    }

    fn apply(
        &self,
        event: &WorldEvent,
        ctx: &mut PassiveContext<'_, '_>,
        outcome: &mut EventOutcome,
    ) -> bool {
        let registry = ctx.scope.registry;
        let learned = ctx.learned(registry, |k| matches!(k, SkillKind::Purification(_)));
        let Some((def, level)) = learned.into_iter().max_by_key(|(_, level)| *level) else {
            return false;
        };
        let SkillKind::Purification(p) = &def.kind else {
            return false;
        };

        match event {
            WorldEvent::StatusApplied { status, .. } => {
                let seed = ctx.seed(roll::STATUS_CANCEL);
                if !ctx.scope.rng.roll_chance(seed, p.cancel_chance(level)) {
                    return false;
                }
                outcome.cancel_status = true;
                outcome
                    .notices
                    .push(format!("{} resisted {status}.", def.name));
                true
            }
            WorldEvent::StatusExpired { status, .. } => {
                let seed = ctx.seed(roll::STATUS_EARLY_REMOVAL);
                if !ctx.scope.rng.roll_chance(seed, p.early_removal_chance(level)) {
                    return false;
                }
                outcome
                    .notices
                    .push(format!("{} purged {status} early.", def.name));
                true
            }
            _ => false,
        }
    }
}
