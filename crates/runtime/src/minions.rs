//! Live shadow soldiers of every player in the session.

use std::collections::BTreeMap;

use tracing::{debug, info};

use monarch_core::{
    ArmyBuff, DamageSource, EntityId, MinionBrain, MinionCommand, MinionConfig, MinionController,
    MinionRecord, MinionSeed, PlayerId, Tick, WorldView,
};

use crate::host::WorldHost;

/// Outcome of one manager tick.
#[derive(Debug, Default)]
pub struct MinionTick {
    /// Commands for the host, in minion id order.
    pub commands: Vec<MinionCommand>,
    /// Minions that dissipated this tick and were dropped from the manager.
    pub dissipated: Vec<(PlayerId, EntityId)>,
}

/// Owns one [`MinionController`] per live minion and a shared brain.
pub struct MinionManager {
    config: MinionConfig,
    brain: MinionBrain,
    controllers: BTreeMap<EntityId, MinionController>,
}

impl MinionManager {
    pub fn new(config: MinionConfig) -> Self {
        Self {
            config,
            brain: MinionBrain::new(),
            controllers: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &MinionConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Army size of `owner`.
    pub fn count(&self, owner: PlayerId) -> u32 {
        self.minions_of(owner).count() as u32
    }

    pub fn minions_of(&self, owner: PlayerId) -> impl Iterator<Item = &MinionController> + '_ {
        self.controllers.values().filter(move |c| c.owner() == owner)
    }

    pub fn get(&self, minion: EntityId) -> Option<&MinionController> {
        self.controllers.get(&minion)
    }

    /// Raises a shadow from `seed`. The host picks the entity id.
    ///
    /// Returns `None` if the host refused to spawn the entity.
    pub fn spawn<H: WorldHost>(
        &mut self,
        seed: &MinionSeed,
        host: &mut H,
        now: Tick,
    ) -> Option<MinionRecord> {
        let mut record = MinionRecord::inherit(EntityId::default(), seed, &self.config, now);
        let id = host.spawn_minion(seed, &record)?;
        record.id = id;
        info!(
            target: "runtime::minions",
            owner = %seed.owner,
            minion = %id,
            archetype = %record.source_archetype,
            "shadow raised"
        );
        self.controllers
            .insert(id, MinionController::new(record.clone(), now));
        Some(record)
    }

    /// Tells every minion of `owner` who just hurt them.
    pub fn note_owner_attacked(&mut self, owner: PlayerId, attacker: EntityId, now: Tick) {
        for controller in self.controllers.values_mut() {
            if controller.owner() == owner && controller.id() != attacker {
                controller.note_owner_attacked(attacker, now);
            }
        }
    }

    /// Applies a command buff to every minion of `owner`.
    pub fn apply_buff(&mut self, owner: PlayerId, buff: ArmyBuff) {
        for controller in self.controllers.values_mut() {
            if controller.owner() == owner {
                controller.apply_buff(buff);
            }
        }
    }

    /// Damage the host should apply for a hit on `minion`, or `None` if the
    /// entity is not a managed minion.
    pub fn incoming_damage(
        &self,
        minion: EntityId,
        source: DamageSource,
        amount: f32,
    ) -> Option<f32> {
        self.controllers
            .get(&minion)
            .map(|c| c.incoming_damage(&self.config, source, amount))
    }

    /// Advances every minion and drops the ones that dissipated.
    pub fn tick(&mut self, world: &dyn WorldView, now: Tick) -> MinionTick {
        let mut report = MinionTick::default();
        for controller in self.controllers.values_mut() {
            report
                .commands
                .extend(controller.tick(world, &self.brain, &self.config, now));
            if controller.is_dissipated() {
                report.dissipated.push((controller.owner(), controller.id()));
            }
        }
        for (owner, minion) in &report.dissipated {
            self.controllers.remove(minion);
            debug!(target: "runtime::minions", %owner, %minion, "shadow dissipated");
        }
        report
    }

    /// Forgets a minion the host removed on its own (killed, unloaded).
    pub fn remove(&mut self, minion: EntityId) -> Option<MinionController> {
        self.controllers.remove(&minion)
    }
}

#[cfg(test)]
mod tests {
    use monarch_core::Position;

    use super::*;
    use crate::testing::TestHost;

    fn seed(owner: u64) -> MinionSeed {
        MinionSeed {
            owner: PlayerId(owner),
            corpse: EntityId(900),
            source_archetype: "minecraft:zombie".into(),
            source_max_health: 20.0,
            source_damage: 3.0,
            source_speed: 0.25,
            position: Position::new(2.0, 64.0, 2.0),
            extraction_level: 1,
        }
    }

    #[test]
    fn spawn_uses_host_id_and_counts_per_owner() {
        let mut host = TestHost::new();
        let mut manager = MinionManager::new(MinionConfig::default());

        let first = manager.spawn(&seed(1), &mut host, Tick(0)).unwrap();
        manager.spawn(&seed(1), &mut host, Tick(0)).unwrap();
        manager.spawn(&seed(2), &mut host, Tick(0)).unwrap();

        assert!(host.entity(first.id).is_some());
        assert_eq!(manager.count(PlayerId(1)), 2);
        assert_eq!(manager.count(PlayerId(2)), 1);
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn refused_spawn_keeps_nothing() {
        let mut host = TestHost::new();
        host.refuse_spawns = true;
        let mut manager = MinionManager::new(MinionConfig::default());
        assert!(manager.spawn(&seed(1), &mut host, Tick(0)).is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn owner_hits_are_ignored() {
        let mut host = TestHost::new();
        let mut manager = MinionManager::new(MinionConfig::default());
        let minion = manager.spawn(&seed(1), &mut host, Tick(0)).unwrap().id;

        assert_eq!(
            manager.incoming_damage(minion, DamageSource::Player(PlayerId(1)), 10.0),
            Some(0.0)
        );
        let taken = manager
            .incoming_damage(minion, DamageSource::Environment, 10.0)
            .unwrap();
        assert!(taken < 10.0);
        assert!(manager
            .incoming_damage(EntityId(12345), DamageSource::Environment, 10.0)
            .is_none());
    }

    #[test]
    fn absent_owner_dissipates_after_timeout() {
        let mut host = TestHost::new();
        let config = MinionConfig::default();
        let mut manager = MinionManager::new(config);
        let minion = manager.spawn(&seed(7), &mut host, Tick(0)).unwrap().id;

        let at_timeout = manager.tick(&host, Tick(config.owner_absent_timeout));
        assert!(at_timeout.dissipated.is_empty());

        let after = manager.tick(&host, Tick(config.owner_absent_timeout + 1));
        assert_eq!(after.dissipated, vec![(PlayerId(7), minion)]);
        assert_eq!(after.commands, vec![MinionCommand::Remove { minion }]);
        assert!(manager.get(minion).is_none());
    }
}
