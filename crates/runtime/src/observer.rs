//! Observer-side mirror of one player's capability.
//!
//! The observer never decides anything. It keeps the latest snapshot for
//! display, collects notices for toasts, and remembers the last rejection.
//! A snapshot always replaces the previous one wholesale; no field merge.

use std::collections::VecDeque;

use monarch_core::PlayerId;

use crate::protocol::{CodecError, ServerMessage, Snapshot, WireCodec};

/// Notices kept before the oldest is dropped.
const NOTICE_BACKLOG: usize = 32;

#[derive(Debug, Clone, Default)]
pub struct Observer {
    player: PlayerId,
    snapshot: Option<Snapshot>,
    notices: VecDeque<String>,
    last_rejection: Option<String>,
}

impl Observer {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            ..Self::default()
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Applies one authoritative message.
    ///
    /// Snapshots addressed to another player are ignored.
    pub fn apply(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::FullSnapshot(snapshot) => {
                if snapshot.player != self.player {
                    tracing::trace!(
                        target: "runtime::observer",
                        expected = %self.player,
                        got = %snapshot.player,
                        "ignoring foreign snapshot"
                    );
                    return;
                }
                self.snapshot = Some(snapshot);
            }
            ServerMessage::Rejected { reason } => {
                self.last_rejection = Some(reason);
            }
            ServerMessage::Notice { text } => {
                if self.notices.len() == NOTICE_BACKLOG {
                    self.notices.pop_front();
                }
                self.notices.push_back(text);
            }
        }
    }

    /// Decodes and applies one wire frame.
    pub fn apply_frame(&mut self, frame: &[u8]) -> Result<(), CodecError> {
        let message = WireCodec::decode_server(frame)?;
        self.apply(message);
        Ok(())
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn last_rejection(&self) -> Option<&str> {
        self.last_rejection.as_deref()
    }

    /// Pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<String> {
        self.notices.drain(..).collect()
    }
}
