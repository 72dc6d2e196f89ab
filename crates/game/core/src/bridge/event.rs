//! Engine notifications and what the bridge decided about them.

use crate::types::{EntityId, PlayerId};
use crate::world::{EntitySnapshot, StatusKind};

/// A host engine notification relevant to progression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldEvent {
    /// `killer` landed the final blow on `victim`.
    EntityKilled {
        killer: PlayerId,
        victim: EntitySnapshot,
    },
    BlockBroken {
        player: PlayerId,
        block: String,
        hardness: f32,
    },
    /// A player took damage. `health_after` is the post-hit health.
    PlayerDamaged {
        player: PlayerId,
        attacker: Option<EntityId>,
        amount: f32,
        health_after: f32,
        max_health: f32,
    },
    /// A status effect is about to be applied to a player.
    StatusApplied {
        player: PlayerId,
        status: StatusKind,
        duration: u64,
    },
    /// A status effect on a player ran out.
    StatusExpired { player: PlayerId, status: StatusKind },
}

impl WorldEvent {
    /// The player whose progression the event affects.
    pub fn player(&self) -> PlayerId {
        match self {
            WorldEvent::EntityKilled { killer, .. } => *killer,
            WorldEvent::BlockBroken { player, .. }
            | WorldEvent::PlayerDamaged { player, .. }
            | WorldEvent::StatusApplied { player, .. }
            | WorldEvent::StatusExpired { player, .. } => *player,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            WorldEvent::EntityKilled { .. } => "entity_killed",
            WorldEvent::BlockBroken { .. } => "block_broken",
            WorldEvent::PlayerDamaged { .. } => "player_damaged",
            WorldEvent::StatusApplied { .. } => "status_applied",
            WorldEvent::StatusExpired { .. } => "status_expired",
        }
    }
}

/// Result of dispatching one [`WorldEvent`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventOutcome {
    /// Experience to award, after passive multipliers.
    pub experience: u64,
    /// Health to restore.
    pub heal: Option<f32>,
    /// The status from a `StatusApplied` event must not be applied.
    pub cancel_status: bool,
    /// Player-facing messages, in trigger order.
    pub notices: Vec<String>,
    /// Names of the passive handlers that fired.
    pub triggered: Vec<&'static str>,
}

impl EventOutcome {
    pub fn is_empty(&self) -> bool {
        self.experience == 0
            && self.heal.is_none()
            && !self.cancel_status
            && self.notices.is_empty()
            && self.triggered.is_empty()
    }
}
