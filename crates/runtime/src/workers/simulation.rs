//! Simulation worker that owns the authoritative [`Authority`].
//!
//! Receives commands from [`crate::RuntimeHandle`] one at a time, applies
//! them, and flushes dirty capabilities to the [`SnapshotSink`] after every
//! command. Saves go through the [`PlayerRepository`] on leave, on autosave
//! and when the command channel closes.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use monarch_core::{
    DamageSource, EntityId, EventOutcome, PlayerId, ProgressionConfig, ProgressionRecord, Tick,
    WorldEvent,
};

use crate::api::{RequestError, Result};
use crate::authority::Authority;
use crate::host::{SnapshotSink, WorldHost};
use crate::protocol::{ClientMessage, Snapshot};
use crate::repository::PlayerRepository;

/// Administrative edit run against one player's record.
pub type AdminEdit = Box<dyn FnOnce(&mut ProgressionRecord, &ProgressionConfig) + Send>;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Load (or create) and register a player.
    Join {
        player: PlayerId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Unregister a player and persist their capability.
    /// Replies `false` if the player was not joined.
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<Result<bool>>,
    },
    /// One observer request.
    Client {
        player: PlayerId,
        message: ClientMessage,
        reply: oneshot::Sender<std::result::Result<(), RequestError>>,
    },
    /// One engine notification.
    World {
        event: WorldEvent,
        reply: oneshot::Sender<EventOutcome>,
    },
    /// Advance session time.
    Tick {
        now: Tick,
        reply: oneshot::Sender<()>,
    },
    MinionDamage {
        minion: EntityId,
        source: DamageSource,
        amount: f32,
        reply: oneshot::Sender<Option<f32>>,
    },
    MinionRemoved {
        minion: EntityId,
    },
    Respawned {
        player: PlayerId,
        reply: oneshot::Sender<bool>,
    },
    Admin {
        player: PlayerId,
        edit: AdminEdit,
        reply: oneshot::Sender<bool>,
    },
    /// Query the authoritative snapshot of a player (read-only).
    QuerySnapshot {
        player: PlayerId,
        reply: oneshot::Sender<Option<Snapshot>>,
    },
    /// Persist every joined player now. Replies with the number saved.
    SaveAll {
        reply: oneshot::Sender<Result<usize>>,
    },
}

impl Command {
    pub const fn kind(&self) -> &'static str {
        match self {
            Command::Join { .. } => "join",
            Command::Leave { .. } => "leave",
            Command::Client { .. } => "client",
            Command::World { .. } => "world",
            Command::Tick { .. } => "tick",
            Command::MinionDamage { .. } => "minion_damage",
            Command::MinionRemoved { .. } => "minion_removed",
            Command::Respawned { .. } => "respawned",
            Command::Admin { .. } => "admin",
            Command::QuerySnapshot { .. } => "query_snapshot",
            Command::SaveAll { .. } => "save_all",
        }
    }
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker<H: WorldHost> {
    authority: Authority,
    host: H,
    sink: Box<dyn SnapshotSink>,
    repository: Arc<dyn PlayerRepository>,
    command_rx: mpsc::Receiver<Command>,
    autosave_interval: u64,
    last_autosave: Tick,
}

impl<H: WorldHost> SimulationWorker<H> {
    /// Creates a new simulation worker.
    ///
    /// An `autosave_interval` of zero disables autosave.
    pub fn new(
        authority: Authority,
        host: H,
        sink: Box<dyn SnapshotSink>,
        repository: Arc<dyn PlayerRepository>,
        command_rx: mpsc::Receiver<Command>,
        autosave_interval: u64,
    ) -> Self {
        Self {
            authority,
            host,
            sink,
            repository,
            command_rx,
            autosave_interval,
            last_autosave: Tick::ZERO,
        }
    }

    /// Main worker loop. Returns once every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            let kind = command.kind();
            self.handle_command(command);
            let sent = self.authority.flush(self.sink.as_mut());
            if sent > 0 {
                debug!(target: "runtime::worker", command = kind, sent, "flushed observer messages");
            }
        }

        match self.save_all() {
            Ok(saved) => info!(target: "runtime::worker", saved, "simulation worker stopped"),
            Err(err) => error!(target: "runtime::worker", "final save failed: {}", err),
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Join { player, reply } => {
                let result = self.join(player);
                respond(reply, result);
            }
            Command::Leave { player, reply } => {
                let result = self.leave(player);
                respond(reply, result);
            }
            Command::Client {
                player,
                message,
                reply,
            } => {
                let result = self
                    .authority
                    .handle_client(player, message, &mut self.host);
                respond(reply, result);
            }
            Command::World { event, reply } => {
                let outcome = self.authority.handle_world(event, &mut self.host);
                respond(reply, outcome);
            }
            Command::Tick { now, reply } => {
                self.authority.tick(now, &mut self.host);
                self.autosave(now);
                respond(reply, ());
            }
            Command::MinionDamage {
                minion,
                source,
                amount,
                reply,
            } => {
                respond(reply, self.authority.minion_damage(minion, source, amount));
            }
            Command::MinionRemoved { minion } => {
                self.authority.minion_removed(minion);
            }
            Command::Respawned { player, reply } => {
                let known = self.authority.respawned(player, &mut self.host);
                respond(reply, known);
            }
            Command::Admin {
                player,
                edit,
                reply,
            } => {
                let known = self.authority.admin(player, edit).is_some();
                respond(reply, known);
            }
            Command::QuerySnapshot { player, reply } => {
                respond(reply, self.authority.snapshot(player));
            }
            Command::SaveAll { reply } => {
                let result = self.save_all();
                respond(reply, result);
            }
        }
    }

    fn join(&mut self, player: PlayerId) -> Result<()> {
        let save = self.repository.load(player).inspect_err(|err| {
            error!(target: "runtime::worker", %player, "failed to load save: {}", err);
        })?;
        self.authority.join(player, save);
        Ok(())
    }

    fn leave(&mut self, player: PlayerId) -> Result<bool> {
        let Some(save) = self.authority.leave(player) else {
            return Ok(false);
        };
        self.repository.save(player, &save).inspect_err(|err| {
            error!(target: "runtime::worker", %player, "failed to save on leave: {}", err);
        })?;
        Ok(true)
    }

    fn save_all(&mut self) -> Result<usize> {
        let saves = self.authority.save_all();
        let count = saves.len();
        for (player, save) in saves {
            self.repository.save(player, &save).inspect_err(|err| {
                error!(target: "runtime::worker", %player, "failed to save: {}", err);
            })?;
        }
        Ok(count)
    }

    fn autosave(&mut self, now: Tick) {
        if self.autosave_interval == 0 || now.since(self.last_autosave) < self.autosave_interval {
            return;
        }
        self.last_autosave = now;
        match self.save_all() {
            Ok(saved) => debug!(target: "runtime::worker", saved, %now, "autosave"),
            Err(err) => error!(target: "runtime::worker", "autosave failed: {}", err),
        }
    }
}

fn respond<T>(reply: oneshot::Sender<T>, value: T) {
    if reply.send(value).is_err() {
        debug!(target: "runtime::worker", "reply receiver dropped");
    }
}
