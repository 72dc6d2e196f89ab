//! Seams to the host engine.
//!
//! The runtime never owns engine objects. It reads the world through
//! [`WorldHost`] (a [`WorldView`] plus a few write hooks) and pushes
//! messages for observers through a [`SnapshotSink`].

use tokio::sync::mpsc;

use monarch_core::{
    EntityId, MinionCommand, MinionRecord, MinionSeed, PlayerId, WorldCommand, WorldView,
};

use crate::protocol::ServerMessage;
use crate::storage::ItemStack;

/// The host engine as seen by the authoritative runtime.
pub trait WorldHost: WorldView + Send {
    /// Applies a world-side consequence (damage, teleport, heal, ...).
    fn apply(&mut self, command: WorldCommand);

    /// Forwards a pathing or combat instruction to a minion entity.
    fn command_minion(&mut self, command: MinionCommand);

    /// Spawns the entity for a freshly raised shadow at the corpse position
    /// in `seed`, with the stats in `record`. Returns the new entity id, or
    /// `None` if the host refused.
    fn spawn_minion(&mut self, seed: &MinionSeed, record: &MinionRecord) -> Option<EntityId>;

    /// Removes `item` from the player's inventory. Returns false if the
    /// player does not hold it.
    fn take_item(&mut self, player: PlayerId, item: &ItemStack) -> bool;

    /// Puts `item` into the player's inventory (or drops it at their feet).
    fn give_item(&mut self, player: PlayerId, item: ItemStack);
}

/// Outbound observer traffic. Fire and forget: no acknowledgement, no retry.
pub trait SnapshotSink: Send {
    fn send(&mut self, player: PlayerId, message: ServerMessage);
}

impl SnapshotSink for Vec<(PlayerId, ServerMessage)> {
    fn send(&mut self, player: PlayerId, message: ServerMessage) {
        self.push((player, message));
    }
}

/// One message addressed to one player's observer.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub player: PlayerId,
    pub message: ServerMessage,
}

/// Sink backed by a bounded channel. A full or closed channel drops the
/// message; the next mutation sends a fresh snapshot anyway.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Outbound>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Outbound>) -> Self {
        Self { tx }
    }
}

impl SnapshotSink for ChannelSink {
    fn send(&mut self, player: PlayerId, message: ServerMessage) {
        if let Err(err) = self.tx.try_send(Outbound { player, message }) {
            tracing::trace!(target: "runtime::sink", %player, "dropping outbound message: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut sink = ChannelSink::new(tx);
        sink.send(PlayerId(1), ServerMessage::Notice { text: "a".into() });
        sink.send(PlayerId(1), ServerMessage::Notice { text: "b".into() });

        let first = rx.recv().await.unwrap();
        assert_eq!(first.message, ServerMessage::Notice { text: "a".into() });
        assert!(rx.try_recv().is_err());
    }
}
