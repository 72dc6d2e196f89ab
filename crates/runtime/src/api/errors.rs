//! Unified error types surfaced by the runtime API.
//!
//! [`RuntimeError`] wraps failures from worker coordination, repositories and
//! the wire codec. [`RequestError`] classifies why a single observer request
//! was refused, following [`ErrorSeverity`].

use thiserror::Error;
use tokio::sync::oneshot;

use monarch_core::{ErrorSeverity, GameError, PlayerId};

pub use crate::protocol::CodecError;
pub use crate::repository::RepositoryError;
use crate::protocol::ServerMessage;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("failed to load content: {0}")]
    Content(String),

    #[error("player {0} is not in the session")]
    UnknownPlayer(PlayerId),
}

/// Why an observer request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Malformed input: unknown stat, unknown skill, bad slot.
    #[error("{message}")]
    Validation { code: &'static str, message: String },

    /// Valid request that cannot run now: cooldown, mana, no target.
    #[error("{message}")]
    Precondition { code: &'static str, message: String },

    /// Sender is not a joined, resolvable player. Never answered.
    #[error("request not authorized")]
    NotAuthorized,

    /// State inconsistency on the authoritative side.
    #[error("internal error: {message}")]
    Internal { code: &'static str, message: String },
}

impl RequestError {
    pub fn from_game_error<E: GameError>(err: &E) -> Self {
        let code = err.error_code();
        match err.severity() {
            ErrorSeverity::Validation => RequestError::Validation {
                code,
                message: err.user_message(),
            },
            ErrorSeverity::Precondition => RequestError::Precondition {
                code,
                message: err.user_message(),
            },
            ErrorSeverity::NotAuthorized => RequestError::NotAuthorized,
            ErrorSeverity::Internal => RequestError::Internal {
                code,
                message: err.to_string(),
            },
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RequestError::Validation { .. } => ErrorSeverity::Validation,
            RequestError::Precondition { .. } => ErrorSeverity::Precondition,
            RequestError::NotAuthorized => ErrorSeverity::NotAuthorized,
            RequestError::Internal { .. } => ErrorSeverity::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RequestError::Validation { code, .. }
            | RequestError::Precondition { code, .. }
            | RequestError::Internal { code, .. } => code,
            RequestError::NotAuthorized => "NOT_AUTHORIZED",
        }
    }

    /// Message for the requesting observer, if it should get one.
    pub fn reply(&self) -> Option<ServerMessage> {
        match self {
            RequestError::Validation { message, .. }
            | RequestError::Precondition { message, .. } => Some(ServerMessage::Rejected {
                reason: message.clone(),
            }),
            RequestError::Internal { .. } => Some(ServerMessage::Rejected {
                reason: "Something went wrong. Please try again.".to_string(),
            }),
            RequestError::NotAuthorized => None,
        }
    }
}
