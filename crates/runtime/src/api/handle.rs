//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! joining players, forwarding observer requests and engine notifications,
//! and streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use monarch_core::{
    DamageSource, EntityId, EventOutcome, PlayerId, ProgressionConfig, ProgressionRecord, Tick,
    WorldEvent,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::protocol::{ClientMessage, Snapshot, WireCodec};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Load or create a player's capability and start mirroring it.
    pub async fn join(&self, player: PlayerId) -> Result<()> {
        self.request(|reply| Command::Join { player, reply }).await?
    }

    /// Persist and drop a player's capability. Returns `false` if they were
    /// not joined.
    pub async fn leave(&self, player: PlayerId) -> Result<bool> {
        self.request(|reply| Command::Leave { player, reply }).await?
    }

    /// Submit one observer request.
    ///
    /// Refusals come back as [`RuntimeError::Request`]; the observer has
    /// already been sent its `Rejected` reply (unless it was unauthorized).
    pub async fn submit(&self, player: PlayerId, message: ClientMessage) -> Result<()> {
        self.request(|reply| Command::Client {
            player,
            message,
            reply,
        })
        .await?
        .map_err(RuntimeError::from)
    }

    /// Decode a wire frame from `player`'s observer and submit it.
    ///
    /// Malformed frames never reach the authority.
    pub async fn submit_frame(&self, player: PlayerId, frame: &[u8]) -> Result<()> {
        let message = WireCodec::decode_client(frame)?;
        self.submit(player, message).await
    }

    /// Forward an engine notification and return what the bridge decided.
    ///
    /// The host must honor `cancel_status` for `StatusApplied` events.
    pub async fn world(&self, event: WorldEvent) -> Result<EventOutcome> {
        self.request(|reply| Command::World { event, reply }).await
    }

    /// Advance session time to `now`.
    pub async fn tick(&self, now: Tick) -> Result<()> {
        self.request(|reply| Command::Tick { now, reply }).await
    }

    /// Damage the host should apply to `minion`, or `None` for entities the
    /// runtime does not manage.
    pub async fn minion_damage(
        &self,
        minion: EntityId,
        source: DamageSource,
        amount: f32,
    ) -> Result<Option<f32>> {
        self.request(|reply| Command::MinionDamage {
            minion,
            source,
            amount,
            reply,
        })
        .await
    }

    /// Report a minion entity the host removed on its own.
    pub async fn minion_removed(&self, minion: EntityId) -> Result<()> {
        self.command_tx
            .send(Command::MinionRemoved { minion })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Report a player body recreated after death or a dimension change.
    pub async fn respawned(&self, player: PlayerId) -> Result<()> {
        let known = self
            .request(|reply| Command::Respawned { player, reply })
            .await?;
        if known {
            Ok(())
        } else {
            Err(RuntimeError::UnknownPlayer(player))
        }
    }

    /// Run an administrative edit (reset, debug grants) on a player's record.
    pub async fn admin(
        &self,
        player: PlayerId,
        edit: impl FnOnce(&mut ProgressionRecord, &ProgressionConfig) + Send + 'static,
    ) -> Result<()> {
        let known = self
            .request(|reply| Command::Admin {
                player,
                edit: Box::new(edit),
                reply,
            })
            .await?;
        if known {
            Ok(())
        } else {
            Err(RuntimeError::UnknownPlayer(player))
        }
    }

    /// Query the authoritative snapshot of a player (read-only).
    pub async fn query_snapshot(&self, player: PlayerId) -> Result<Option<Snapshot>> {
        self.request(|reply| Command::QuerySnapshot { player, reply })
            .await
    }

    /// Persist every joined player. Returns how many were saved.
    pub async fn save_all(&self) -> Result<usize> {
        self.request(|reply| Command::SaveAll { reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Progression` - experience, level-ups, titles, stat allocation
    /// - `Topic::Skill` - activations, rejections, upgrades, passive triggers
    /// - `Topic::Minion` - shadow soldier lifecycle
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
