//! Single authoritative owner of every joined player's capability.
//!
//! ```text
//! ClientMessage ─┐                        ┌─▶ WorldHost (commands, spawns)
//! WorldEvent ────┼─▶ Authority (mutate) ──┼─▶ EventBus (runtime events)
//! Tick ──────────┘                        └─▶ dirty ─▶ flush ─▶ SnapshotSink
//! ```
//!
//! All decisions happen here. Observers only mirror what [`Authority::flush`]
//! sends them. The authority is driven by one task (see
//! [`crate::workers::SimulationWorker`]) so requests apply strictly in
//! arrival order.

mod capability;

pub use capability::PlayerCapability;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use monarch_content::Content;
use monarch_core::{
    ActivationContext, DamageSource, DerivedKind, EntityId, EventBridge, EventOutcome, GameConfig,
    GameError, PcgRng, PlayerId, PlayerScope, ProgressionConfig, ProgressionRecord, RngOracle,
    SkillId, SkillKind, SkillRegistry, Tick, WorldCommand, WorldEvent,
};

use crate::api::RequestError;
use crate::events::{EventBus, MinionEvent, ProgressionEvent, SkillEvent};
use crate::host::{SnapshotSink, WorldHost};
use crate::minions::MinionManager;
use crate::protocol::{ClientMessage, ServerMessage, Snapshot};
use crate::repository::SaveData;

/// Authoritative session state.
pub struct Authority {
    config: GameConfig,
    registry: Arc<SkillRegistry>,
    bridge: EventBridge,
    rng: Box<dyn RngOracle>,
    session_seed: u64,
    now: Tick,
    players: BTreeMap<PlayerId, PlayerCapability>,
    minions: MinionManager,
    outbox: Vec<(PlayerId, ServerMessage)>,
    events: EventBus,
}

impl Authority {
    pub fn new(content: Content, session_seed: u64, events: EventBus) -> Self {
        let Content {
            config,
            skills,
            classifier,
        } = content;
        Self {
            bridge: EventBridge::standard(classifier, config.rewards.clone()),
            minions: MinionManager::new(config.minions),
            config,
            registry: Arc::new(skills),
            rng: Box::new(PcgRng),
            session_seed,
            now: Tick::ZERO,
            players: BTreeMap::new(),
            outbox: Vec::new(),
            events,
        }
    }

    /// Replaces the roll oracle, e.g. with a [`monarch_core::FixedRng`].
    pub fn with_rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn session_seed(&self) -> u64 {
        self.session_seed
    }

    pub fn minions(&self) -> &MinionManager {
        &self.minions
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn capability(&self, player: PlayerId) -> Option<&PlayerCapability> {
        self.players.get(&player)
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.keys().copied()
    }

    // ===== session membership =====

    /// Brings a player into the session, from `save` if they have one.
    ///
    /// Joining twice keeps the live capability.
    pub fn join(&mut self, player: PlayerId, save: Option<SaveData>) {
        if let Some(existing) = self.players.get_mut(&player) {
            debug!(target: "runtime::authority", %player, "already joined");
            existing.mark_dirty();
            return;
        }
        let progression = &self.config.progression;
        let capability = match save {
            Some(data) => PlayerCapability::from_save(&data, progression, &self.registry, self.now),
            None => PlayerCapability::new(progression, self.now),
        };
        info!(
            target: "runtime::authority",
            %player,
            level = capability.record().level(),
            "player joined"
        );
        self.players.insert(player, capability);
    }

    /// Removes a player and returns what must be persisted.
    ///
    /// Their minions stay until the owner-absence timeout dissipates them.
    pub fn leave(&mut self, player: PlayerId) -> Option<SaveData> {
        let capability = self.players.remove(&player)?;
        self.outbox.retain(|(to, _)| *to != player);
        info!(target: "runtime::authority", %player, "player left");
        Some(capability.to_save())
    }

    pub fn save_data(&self, player: PlayerId) -> Option<SaveData> {
        self.players.get(&player).map(PlayerCapability::to_save)
    }

    /// Save documents for every joined player.
    pub fn save_all(&self) -> Vec<(PlayerId, SaveData)> {
        self.players
            .iter()
            .map(|(id, cap)| (*id, cap.to_save()))
            .collect()
    }

    pub fn snapshot(&self, player: PlayerId) -> Option<Snapshot> {
        let capability = self.players.get(&player)?;
        Some(capability.snapshot(
            player,
            &self.config.progression,
            self.minions.count(player),
            self.now,
        ))
    }

    // ===== observer requests =====

    /// Validates and applies one observer request.
    ///
    /// Validation and precondition failures queue a `Rejected` reply for the
    /// sender. Requests from players that are not joined or not resolvable
    /// in the world are dropped without a reply.
    pub fn handle_client<H: WorldHost>(
        &mut self,
        player: PlayerId,
        message: ClientMessage,
        host: &mut H,
    ) -> Result<(), RequestError> {
        let kind = message.kind();
        let result = self.execute(player, message, host);
        if let Err(err) = &result {
            match err.reply() {
                Some(reply) => {
                    debug!(
                        target: "runtime::authority",
                        %player,
                        request = kind,
                        code = err.code(),
                        "request rejected"
                    );
                    self.outbox.push((player, reply));
                }
                None => warn!(
                    target: "runtime::authority",
                    %player,
                    request = kind,
                    "dropping unauthorized request"
                ),
            }
        }
        result
    }

    fn execute<H: WorldHost>(
        &mut self,
        player: PlayerId,
        message: ClientMessage,
        host: &mut H,
    ) -> Result<(), RequestError> {
        if !self.players.contains_key(&player) {
            return Err(RequestError::NotAuthorized);
        }
        match message {
            ClientMessage::AllocateStat { stat } => self.allocate_stat(player, &stat, host),
            ClientMessage::ActivateSkill { skill } => self.activate_skill(player, skill, host),
            ClientMessage::UpgradeSkill { skill } => self.upgrade_skill(player, skill),
            ClientMessage::StoreItem { item } => {
                self.capability_mut(player)?
                    .storage
                    .check(&item)
                    .map_err(|e| RequestError::from_game_error(&e))?;
                if !host.take_item(player, &item) {
                    return Err(RequestError::Validation {
                        code: "ITEM_NOT_HELD",
                        message: "You are not holding that item.".to_string(),
                    });
                }
                let capability = self.capability_mut(player)?;
                if let Err(e) = capability.storage.store(item.clone()) {
                    host.give_item(player, item);
                    return Err(RequestError::from_game_error(&e));
                }
                capability.mark_dirty();
                Ok(())
            }
            ClientMessage::WithdrawItem { index } => {
                let capability = self.capability_mut(player)?;
                let item = capability
                    .storage
                    .withdraw(index)
                    .map_err(|e| RequestError::from_game_error(&e))?;
                capability.mark_dirty();
                host.give_item(player, item);
                Ok(())
            }
            ClientMessage::RequestSnapshot => {
                self.capability_mut(player)?.mark_dirty();
                Ok(())
            }
        }
    }

    fn capability_mut(&mut self, player: PlayerId) -> Result<&mut PlayerCapability, RequestError> {
        self.players
            .get_mut(&player)
            .ok_or(RequestError::NotAuthorized)
    }

    fn allocate_stat<H: WorldHost>(
        &mut self,
        player: PlayerId,
        stat: &str,
        host: &mut H,
    ) -> Result<(), RequestError> {
        let capability = self
            .players
            .get_mut(&player)
            .ok_or(RequestError::NotAuthorized)?;
        let allocation = capability
            .record
            .allocate_stat_point(&self.config.progression, stat)
            .map_err(|e| RequestError::from_game_error(&e))?;
        capability.mark_dirty();

        if let Some((DerivedKind::MaxHealth, value)) = allocation.derived {
            host.apply(WorldCommand::SetMaxHealth { player, value });
        }
        debug!(
            target: "runtime::authority",
            %player,
            stat = %allocation.stat,
            value = allocation.new_value,
            "stat allocated"
        );
        self.events.publish(ProgressionEvent::StatAllocated {
            player,
            stat: allocation.stat,
            new_value: allocation.new_value,
        });
        Ok(())
    }

    fn activate_skill<H: WorldHost>(
        &mut self,
        player: PlayerId,
        skill: SkillId,
        host: &mut H,
    ) -> Result<(), RequestError> {
        let view = host.player(player).ok_or(RequestError::NotAuthorized)?;
        let army_size = self.minions.count(player);
        let now = self.now;
        let capability = self
            .players
            .get_mut(&player)
            .ok_or(RequestError::NotAuthorized)?;

        let ctx = ActivationContext {
            player: &view,
            world: &*host,
            rng: self.rng.as_ref(),
            session_seed: self.session_seed,
            now,
            army_size,
            minions: self.minions.config(),
        };
        let result =
            self.registry
                .activate(&skill, &mut capability.skills, &mut capability.record, &ctx);
        let activation = match result {
            Ok(activation) => activation,
            Err(err) => {
                debug!(target: "runtime::authority", %player, %skill, "activation rejected: {}", err);
                self.events.publish(SkillEvent::Rejected {
                    player,
                    skill,
                    code: err.error_code().to_string(),
                    at: now,
                });
                return Err(RequestError::from_game_error(&err));
            }
        };
        capability.mark_dirty();

        let raised = activation
            .spawned
            .as_ref()
            .map(|seed| self.minions.spawn(seed, host, now));
        let refused = matches!(raised, Some(None));
        for command in activation.commands {
            if refused && matches!(command, WorldCommand::ConsumeCorpse { .. }) {
                continue;
            }
            host.apply(command);
        }

        match raised {
            Some(Some(record)) => {
                self.outbox.push((
                    player,
                    ServerMessage::Notice {
                        text: "Arise! A new shadow joins your army.".to_string(),
                    },
                ));
                self.events.publish(MinionEvent::Spawned {
                    owner: player,
                    minion: record.id,
                    archetype: record.source_archetype,
                    at: now,
                });
            }
            Some(None) => {
                warn!(target: "runtime::authority", %player, "host refused to spawn a shadow");
            }
            None => {
                let extraction = self
                    .registry
                    .get(skill.as_str())
                    .is_some_and(|def| matches!(def.kind, SkillKind::Extraction(_)));
                if extraction {
                    self.outbox.push((
                        player,
                        ServerMessage::Notice {
                            text: "The shadow refused to rise.".to_string(),
                        },
                    ));
                    self.events
                        .publish(MinionEvent::ExtractionFizzled { owner: player, at: now });
                }
            }
        }

        if let Some(buff) = activation.buff {
            self.minions.apply_buff(player, buff);
        }

        debug!(
            target: "runtime::authority",
            %player,
            %skill,
            level = activation.level,
            cost = activation.cost,
            "skill activated"
        );
        self.events.publish(SkillEvent::Activated {
            player,
            skill: activation.skill,
            level: activation.level,
            cost: activation.cost,
            at: now,
        });
        Ok(())
    }

    fn upgrade_skill(&mut self, player: PlayerId, skill: SkillId) -> Result<(), RequestError> {
        let capability = self
            .players
            .get_mut(&player)
            .ok_or(RequestError::NotAuthorized)?;
        match self
            .registry
            .upgrade(&skill, &mut capability.skills, &mut capability.record)
        {
            Ok(upgrade) => {
                capability.mark_dirty();
                info!(
                    target: "runtime::authority",
                    %player,
                    skill = %upgrade.skill,
                    level = upgrade.new_level,
                    "skill upgraded"
                );
                self.events.publish(SkillEvent::Upgraded {
                    player,
                    skill: upgrade.skill,
                    new_level: upgrade.new_level,
                });
                Ok(())
            }
            Err(err) => {
                self.events.publish(SkillEvent::Rejected {
                    player,
                    skill,
                    code: err.error_code().to_string(),
                    at: self.now,
                });
                Err(RequestError::from_game_error(&err))
            }
        }
    }

    // ===== engine notifications =====

    /// Routes one engine notification through the event bridge and applies
    /// the outcome to the affected player.
    ///
    /// A hit with a known attacker also alerts the victim's minions. Events
    /// for players who are not joined produce an empty outcome.
    pub fn handle_world<H: WorldHost>(&mut self, event: WorldEvent, host: &mut H) -> EventOutcome {
        let player = event.player();
        let now = self.now;
        if let WorldEvent::PlayerDamaged {
            attacker: Some(attacker),
            ..
        } = &event
        {
            self.minions.note_owner_attacked(player, *attacker, now);
        }

        let Some(capability) = self.players.get_mut(&player) else {
            debug!(target: "runtime::authority", %player, event = event.kind(), "event for absent player");
            return EventOutcome::default();
        };

        let mut scope = PlayerScope {
            player,
            registry: self.registry.as_ref(),
            book: &mut capability.skills,
            rng: self.rng.as_ref(),
            session_seed: self.session_seed,
            now,
        };
        let outcome = self.bridge.dispatch(&event, &mut scope);

        if outcome.experience > 0 {
            let summary =
                capability
                    .record
                    .add_experience(&self.config.progression, outcome.experience, now);
            capability.mark_dirty();
            self.events.publish(ProgressionEvent::ExperienceGained {
                player,
                amount: outcome.experience,
                source: event.kind().to_string(),
                at: now,
            });
            if summary.leveled_up() {
                info!(
                    target: "runtime::authority",
                    %player,
                    level = summary.new_level,
                    gained = summary.levels_gained,
                    "level up"
                );
                self.outbox.push((
                    player,
                    ServerMessage::Notice {
                        text: format!("Level up! You are now level {}.", summary.new_level),
                    },
                ));
                self.events.publish(ProgressionEvent::LevelUp {
                    player,
                    new_level: summary.new_level,
                    levels_gained: summary.levels_gained,
                    at: now,
                });
            }
            if summary.title_unlocked {
                let title = capability.record.title().to_string();
                self.outbox.push((
                    player,
                    ServerMessage::Notice {
                        text: format!("Title unlocked: {title}"),
                    },
                ));
                self.events
                    .publish(ProgressionEvent::TitleUnlocked { player, title });
            }
        }

        if let Some(amount) = outcome.heal {
            host.apply(WorldCommand::Heal { player, amount });
        }
        if outcome.cancel_status
            && let WorldEvent::StatusApplied { status, .. } = &event
        {
            host.apply(WorldCommand::RemoveStatus {
                player,
                status: *status,
            });
        }
        if !outcome.triggered.is_empty() {
            capability.mark_dirty();
            for passive in &outcome.triggered {
                self.events.publish(SkillEvent::PassiveTriggered {
                    player,
                    passive: (*passive).to_string(),
                    at: now,
                });
            }
        }
        for text in &outcome.notices {
            self.outbox.push((player, ServerMessage::Notice { text: text.clone() }));
        }
        outcome
    }

    /// Advances session time: mana regeneration and minion AI.
    pub fn tick<H: WorldHost>(&mut self, now: Tick, host: &mut H) {
        self.now = now;
        for capability in self.players.values_mut() {
            capability.regenerate(&self.config.progression, now);
        }

        let report = self.minions.tick(&*host, now);
        for command in report.commands {
            host.command_minion(command);
        }
        for (owner, minion) in report.dissipated {
            if let Some(capability) = self.players.get_mut(&owner) {
                capability.mark_dirty();
            }
            self.events.publish(MinionEvent::Dissipated {
                owner,
                minion,
                at: now,
            });
        }
    }

    /// Damage the host should apply to a minion for a hit of `amount`.
    pub fn minion_damage(&self, minion: EntityId, source: DamageSource, amount: f32) -> Option<f32> {
        self.minions.incoming_damage(minion, source, amount)
    }

    /// The host removed a minion entity (killed or unloaded).
    pub fn minion_removed(&mut self, minion: EntityId) {
        let Some(controller) = self.minions.remove(minion) else {
            return;
        };
        let owner = controller.owner();
        if let Some(capability) = self.players.get_mut(&owner) {
            capability.mark_dirty();
        }
        debug!(target: "runtime::authority", %owner, %minion, "shadow removed by host");
        self.events.publish(MinionEvent::Removed { owner, minion });
    }

    /// The player body was recreated; push the derived max health again.
    ///
    /// The capability itself carries over unchanged.
    pub fn respawned<H: WorldHost>(&mut self, player: PlayerId, host: &mut H) -> bool {
        let Some(capability) = self.players.get_mut(&player) else {
            return false;
        };
        let value = capability.record.max_health(&self.config.progression);
        host.apply(WorldCommand::SetMaxHealth { player, value });
        capability.mark_dirty();
        true
    }

    /// Runs an administrative edit (level reset, debug grants) on a record.
    pub fn admin<R>(
        &mut self,
        player: PlayerId,
        edit: impl FnOnce(&mut ProgressionRecord, &ProgressionConfig) -> R,
    ) -> Option<R> {
        let capability = self.players.get_mut(&player)?;
        let result = edit(&mut capability.record, &self.config.progression);
        capability.mark_dirty();
        info!(target: "runtime::authority", %player, "administrative edit applied");
        Some(result)
    }

    // ===== observer sync =====

    /// Sends a snapshot for every dirty player, then queued replies and
    /// notices. Returns the number of messages handed to the sink.
    pub fn flush(&mut self, sink: &mut dyn SnapshotSink) -> usize {
        let mut sent = 0;
        for (player, capability) in self.players.iter_mut() {
            if !capability.take_dirty() {
                continue;
            }
            let snapshot = capability.snapshot(
                *player,
                &self.config.progression,
                self.minions.count(*player),
                self.now,
            );
            sink.send(*player, ServerMessage::FullSnapshot(snapshot));
            sent += 1;
        }
        for (player, message) in self.outbox.drain(..) {
            sink.send(player, message);
            sent += 1;
        }
        sent
    }
}
