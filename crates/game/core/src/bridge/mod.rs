//! Routing of engine events into progression.
//!
//! ```text
//! WorldEvent ──▶ base reward (kill / block formulas)
//!            ──▶ PassiveBus (insight → recovery → purification)
//!            ──▶ EventOutcome { experience, heal, cancel_status, notices }
//! ```
//!
//! The bridge does not touch the progression record. The caller applies the
//! outcome (experience, heal command, status cancel) on the authoritative side.

mod event;
mod passives;
mod rewards;

pub use event::{EventOutcome, WorldEvent};
pub use passives::{
    InsightHandler, PassiveBus, PassiveContext, PassiveHandler, PlayerScope, PurificationHandler,
    RecoveryHandler,
};
pub use rewards::{EntityClassifier, EntityTier, block_experience, kill_experience};

use crate::config::RewardConfig;

/// Turns world events into progression outcomes for one player at a time.
#[derive(Clone)]
pub struct EventBridge {
    bus: PassiveBus,
    classifier: EntityClassifier,
    rewards: RewardConfig,
}

impl EventBridge {
    pub fn new(bus: PassiveBus, classifier: EntityClassifier, rewards: RewardConfig) -> Self {
        Self {
            bus,
            classifier,
            rewards,
        }
    }

    /// Bridge with [`PassiveBus::standard`].
    pub fn standard(classifier: EntityClassifier, rewards: RewardConfig) -> Self {
        Self::new(PassiveBus::standard(), classifier, rewards)
    }

    pub fn bus(&self) -> &PassiveBus {
        &self.bus
    }

    pub fn classifier(&self) -> &EntityClassifier {
        &self.classifier
    }

    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    /// Computes the base reward for `event`, then lets the passives react.
    ///
    /// `scope` must belong to `event.player()`.
    pub fn dispatch(&self, event: &WorldEvent, scope: &mut PlayerScope<'_>) -> EventOutcome {
        let mut outcome = EventOutcome {
            experience: self.base_experience(event),
            ..EventOutcome::default()
        };
        let mut ctx = PassiveContext {
            scope,
            classifier: &self.classifier,
            rewards: &self.rewards,
        };
        self.bus.run(event, &mut ctx, &mut outcome);
        outcome
    }

    fn base_experience(&self, event: &WorldEvent) -> u64 {
        match event {
            WorldEvent::EntityKilled { victim, .. } => {
                let tier = self.classifier.classify(victim);
                kill_experience(victim.max_health, tier, &self.rewards)
            }
            WorldEvent::BlockBroken { hardness, .. } => block_experience(*hardness, &self.rewards),
            _ => 0,
        }
    }
}
