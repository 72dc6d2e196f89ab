//! Skill errors.

use std::fmt;

use crate::error::{ErrorSeverity, GameError};

use super::SkillId;

/// Why a skill's world-side precondition did not hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precondition {
    NoTargetInRange,
    NoCorpseInRange,
    ArmyFull { cap: u32 },
    NoMinions,
    NoHostilesNearby,
    NoLookDirection,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::NoTargetInRange => f.write_str("no target in range"),
            Precondition::NoCorpseInRange => f.write_str("no fresh corpse in range"),
            Precondition::ArmyFull { cap } => write!(f, "army is full ({cap})"),
            Precondition::NoMinions => f.write_str("no shadows to command"),
            Precondition::NoHostilesNearby => f.write_str("no hostiles nearby"),
            Precondition::NoLookDirection => f.write_str("no look direction"),
        }
    }
}

/// Errors returned by skill activation and upgrade.
///
/// A rejected activation refunds any mana it spent and leaves the cooldown
/// stamp untouched.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillError {
    #[error("unknown skill '{0}'")]
    UnknownSkill(SkillId),

    /// Passive skills cannot be activated.
    #[error("skill '{0}' is passive")]
    NotActive(SkillId),

    #[error("skill '{0}' has not been learned")]
    NotUnlocked(SkillId),

    #[error("skill '{skill}' is on cooldown for {remaining_ticks} more ticks")]
    OnCooldown { skill: SkillId, remaining_ticks: u64 },

    #[error("insufficient mana: need {required:.1}, have {available:.1}")]
    InsufficientResource { required: f32, available: f32 },

    #[error("precondition failed: {0}")]
    PreconditionFailed(Precondition),

    #[error("skill '{skill}' is already at max level {max_level}")]
    AlreadyMaxLevel { skill: SkillId, max_level: u32 },

    #[error("skill '{skill}' requires player level {required}")]
    PlayerLevelTooLow { skill: SkillId, required: u32 },

    #[error("no skill points available")]
    NoSkillPoints,

    #[error("skill book is full")]
    BookFull,
}

impl GameError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownSkill(_) | Self::NotActive(_) => ErrorSeverity::Validation,
            Self::NotUnlocked(_)
            | Self::OnCooldown { .. }
            | Self::InsufficientResource { .. }
            | Self::PreconditionFailed(_)
            | Self::AlreadyMaxLevel { .. }
            | Self::PlayerLevelTooLow { .. }
            | Self::NoSkillPoints => ErrorSeverity::Precondition,
            Self::BookFull => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownSkill(_) => "UNKNOWN_SKILL",
            Self::NotActive(_) => "SKILL_NOT_ACTIVE",
            Self::NotUnlocked(_) => "SKILL_NOT_UNLOCKED",
            Self::OnCooldown { .. } => "SKILL_ON_COOLDOWN",
            Self::InsufficientResource { .. } => "INSUFFICIENT_RESOURCE",
            Self::PreconditionFailed(_) => "SKILL_PRECONDITION_FAILED",
            Self::AlreadyMaxLevel { .. } => "SKILL_MAX_LEVEL",
            Self::PlayerLevelTooLow { .. } => "PLAYER_LEVEL_TOO_LOW",
            Self::NoSkillPoints => "NO_SKILL_POINTS",
            Self::BookFull => "SKILL_BOOK_FULL",
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::UnknownSkill(id) => format!("There is no skill called '{id}'."),
            Self::NotActive(id) => format!("'{id}' is a passive skill."),
            Self::NotUnlocked(id) => format!("You have not learned '{id}' yet."),
            Self::OnCooldown {
                remaining_ticks, ..
            } => {
                let seconds = remaining_ticks.div_ceil(crate::config::GameConfig::TICKS_PER_SECOND);
                format!("Skill on cooldown ({seconds}s).")
            }
            Self::InsufficientResource { required, .. } => {
                format!("Not enough mana ({required:.0} required).")
            }
            Self::PreconditionFailed(reason) => format!("Cannot use that now: {reason}."),
            Self::AlreadyMaxLevel { max_level, .. } => {
                format!("That skill is already at max level ({max_level}).")
            }
            Self::PlayerLevelTooLow { required, .. } => {
                format!("You must reach level {required} first.")
            }
            Self::NoSkillPoints => "You have no points to spend.".to_string(),
            Self::BookFull => "Something went wrong.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_message_rounds_up_to_seconds() {
        let err = SkillError::OnCooldown {
            skill: SkillId::from("dash"),
            remaining_ticks: 21,
        };
        assert_eq!(err.user_message(), "Skill on cooldown (2s).");
        assert!(err.severity().is_user_facing());
    }

    #[test]
    fn internal_errors_are_not_user_facing() {
        assert!(!SkillError::BookFull.severity().is_user_facing());
    }
}
