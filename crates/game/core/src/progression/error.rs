//! Progression errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors returned by [`super::ProgressionRecord`] operations.
///
/// Every variant leaves the record unchanged.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProgressionError {
    /// The stat name did not match any recognized stat.
    #[error("unknown stat '{0}'")]
    UnknownStat(String),

    /// No unspent stat points left.
    #[error("no stat points available")]
    NoStatPoints,

    /// Not enough mana for the requested spend.
    #[error("insufficient mana: need {required:.1}, have {available:.1}")]
    InsufficientResource { required: f32, available: f32 },
}

impl GameError for ProgressionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownStat(_) => ErrorSeverity::Validation,
            Self::NoStatPoints | Self::InsufficientResource { .. } => ErrorSeverity::Precondition,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStat(_) => "UNKNOWN_STAT",
            Self::NoStatPoints => "NO_STAT_POINTS",
            Self::InsufficientResource { .. } => "INSUFFICIENT_RESOURCE",
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::UnknownStat(name) => format!("There is no stat called '{name}'."),
            Self::NoStatPoints => "You have no stat points to spend.".to_string(),
            Self::InsufficientResource { required, .. } => {
                format!("Not enough mana ({required:.0} required).")
            }
        }
    }
}
