//! Common error infrastructure for monarch-core.
//!
//! Domain-specific errors (`ProgressionError`, `SkillError`) are defined next
//! to the operations they validate. They all implement [`GameError`] so the
//! runtime can pick a reporting strategy without matching on every variant.
//!
//! Nothing in this crate is fatal: every failure leaves state untouched and
//! reports a reason upward.

/// Classification of a failure, used to decide how it is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Malformed input (unknown stat name, unknown skill id).
    ///
    /// Surfaced to the user as a message; no state change.
    Validation,

    /// Valid request that cannot run right now (cooldown, mana, range).
    ///
    /// Surfaced to the user with a specific reason; any consumed resource is refunded.
    Precondition,

    /// Request from a source that may not perform it.
    ///
    /// Rejected silently; treated as a desync or abuse signal.
    NotAuthorized,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Precondition => "precondition",
            Self::NotAuthorized => "not_authorized",
            Self::Internal => "internal",
        }
    }

    /// Returns true if the failure should be reported back to the requesting user.
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation | Self::Precondition)
    }
}

/// Common trait for all monarch-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Text suitable for a toast shown to the player.
    fn user_message(&self) -> String {
        self.to_string()
    }
}
