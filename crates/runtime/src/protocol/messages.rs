//! Payload schema.

use serde::{Deserialize, Serialize};

use monarch_core::{PlayerId, ProgressionRecord, SkillBook, SkillId, Tick};

use crate::storage::{ItemStack, ItemStorage};

/// Observer → authoritative requests.
///
/// Nothing in a request is trusted: every one is re-validated against the
/// authoritative capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Spend one stat point on the named stat.
    AllocateStat { stat: String },
    ActivateSkill { skill: SkillId },
    /// Spend one stat point on a skill level.
    UpgradeSkill { skill: SkillId },
    StoreItem { item: ItemStack },
    WithdrawItem { index: usize },
    /// Ask for a fresh snapshot, e.g. after the observer reconnected.
    RequestSnapshot,
}

impl ClientMessage {
    pub const fn kind(&self) -> &'static str {
        match self {
            ClientMessage::AllocateStat { .. } => "allocate_stat",
            ClientMessage::ActivateSkill { .. } => "activate_skill",
            ClientMessage::UpgradeSkill { .. } => "upgrade_skill",
            ClientMessage::StoreItem { .. } => "store_item",
            ClientMessage::WithdrawItem { .. } => "withdraw_item",
            ClientMessage::RequestSnapshot => "request_snapshot",
        }
    }
}

/// Authoritative → observer messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Complete capability state; replaces whatever the observer holds.
    FullSnapshot(Snapshot),
    /// Why the last request was refused, as a toast-style message.
    Rejected { reason: String },
    /// Passive triggers, level-ups and other feedback.
    Notice { text: String },
}

/// Everything the observer mirrors for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: PlayerId,
    pub record: ProgressionRecord,
    /// Max health derived from vitality.
    pub max_health: f32,
    pub skills: SkillBook,
    pub storage: ItemStorage,
    /// Shadow soldiers currently alive for this player.
    pub army_size: u32,
    pub taken_at: Tick,
}
