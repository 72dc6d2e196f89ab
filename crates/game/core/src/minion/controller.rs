//! Per-minion state machine.

use strum::{Display, IntoStaticStr};

use crate::config::MinionConfig;
use crate::types::{EntityId, PlayerId, Position, Tick};
use crate::world::{DamageSource, EntitySnapshot, PlayerView, WorldView};

use super::brain::{Blackboard, Decision, MinionBrain};
use super::record::{ArmyBuff, MinionRecord};

/// Lifecycle of a shadow soldier. `Dissipating` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MinionState {
    Idle,
    Following,
    Attacking,
    Defending,
    Dissipating,
}

/// Instruction for the host's pathing and combat systems.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MinionCommand {
    MoveTo {
        minion: EntityId,
        to: Position,
        speed: f32,
    },
    StopMoving {
        minion: EntityId,
    },
    Attack {
        minion: EntityId,
        target: EntityId,
        damage: f32,
    },
    /// Despawn the minion entity.
    Remove {
        minion: EntityId,
    },
}

/// Drives one minion: owner tracking, thinking cadence and target memory.
#[derive(Clone, Debug)]
pub struct MinionController {
    record: MinionRecord,
    state: MinionState,
    owner_last_seen: Tick,
    last_think: Option<Tick>,
    owner_attacked: Option<(EntityId, Tick)>,
    buff: Option<ArmyBuff>,
}

impl MinionController {
    pub fn new(record: MinionRecord, now: Tick) -> Self {
        Self {
            record,
            state: MinionState::Idle,
            owner_last_seen: now,
            last_think: None,
            owner_attacked: None,
            buff: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.record.id
    }

    pub fn owner(&self) -> PlayerId {
        self.record.owner
    }

    pub fn record(&self) -> &MinionRecord {
        &self.record
    }

    pub fn state(&self) -> MinionState {
        self.state
    }

    pub fn is_dissipated(&self) -> bool {
        self.state == MinionState::Dissipating
    }

    /// Remembers who hurt the owner so the next think can retaliate.
    pub fn note_owner_attacked(&mut self, attacker: EntityId, now: Tick) {
        self.owner_attacked = Some((attacker, now));
    }

    pub fn apply_buff(&mut self, buff: ArmyBuff) {
        self.buff = Some(buff);
    }

    /// Damage per hit including any active command buff.
    pub fn attack_damage(&self, now: Tick) -> f32 {
        let multiplier = self
            .buff
            .filter(|b| b.is_active(now))
            .map_or(1.0, |b| b.damage_multiplier);
        self.record.inherited_damage * multiplier
    }

    pub fn incoming_damage(&self, config: &MinionConfig, source: DamageSource, amount: f32) -> f32 {
        self.record.incoming_damage(config, source, amount)
    }

    /// Advances the minion by one tick.
    ///
    /// Owner absence is evaluated every tick; the decision tree runs at most
    /// once per `think_interval`.
    pub fn tick(
        &mut self,
        world: &dyn WorldView,
        brain: &MinionBrain,
        config: &MinionConfig,
        now: Tick,
    ) -> Vec<MinionCommand> {
        if self.is_dissipated() {
            return Vec::new();
        }

        let Some(owner) = world.player(self.record.owner) else {
            if now.since(self.owner_last_seen) > config.owner_absent_timeout {
                self.state = MinionState::Dissipating;
                self.record.current_target = None;
                return vec![MinionCommand::Remove {
                    minion: self.record.id,
                }];
            }
            return Vec::new();
        };
        self.owner_last_seen = now;

        if self
            .last_think
            .is_some_and(|at| now.since(at) < config.think_interval)
        {
            return Vec::new();
        }
        let Some(me) = world.entity(self.record.id).filter(|e| e.alive) else {
            return Vec::new();
        };
        self.last_think = Some(now);

        let mut blackboard = self.blackboard(world, &owner, &me, config, now);
        let decision = brain.think(&mut blackboard);
        self.apply(decision, now)
    }

    fn blackboard(
        &self,
        world: &dyn WorldView,
        owner: &PlayerView,
        me: &EntitySnapshot,
        config: &MinionConfig,
        now: Tick,
    ) -> Blackboard {
        let valid = |e: &EntitySnapshot, radius: f64| {
            e.alive
                && e.id != me.id
                && e.id != owner.entity
                && !e.is_minion_of(self.record.owner)
                && me.position.distance_to(&e.position) <= radius
        };

        let window = config.think_interval.saturating_mul(2);
        let owner_attacker = self
            .owner_attacked
            .filter(|(_, at)| now.since(*at) <= window)
            .and_then(|(id, _)| world.entity(id))
            .filter(|e| {
                valid(e, config.leash_radius)
                    && owner.position.distance_to(&e.position) <= config.defend_radius
            });

        let current_target = self
            .record
            .current_target
            .and_then(|id| world.entity(id))
            .filter(|e| valid(e, config.leash_radius));

        let hostiles = world
            .entities_near(&me.position, config.search_radius)
            .into_iter()
            .filter(|e| e.is_hostile() && valid(e, config.search_radius))
            .collect();

        Blackboard {
            config: *config,
            position: me.position,
            owner_position: owner.position,
            following: self.state == MinionState::Following,
            owner_attacker,
            current_target,
            hostiles,
            decision: None,
        }
    }

    fn apply(&mut self, decision: Decision, now: Tick) -> Vec<MinionCommand> {
        let minion = self.record.id;
        let was_following = self.state == MinionState::Following;
        match decision {
            Decision::Defend(target) | Decision::Attack(target) => {
                self.state = if matches!(decision, Decision::Defend(_)) {
                    MinionState::Defending
                } else {
                    MinionState::Attacking
                };
                self.record.current_target = Some(target);
                vec![MinionCommand::Attack {
                    minion,
                    target,
                    damage: self.attack_damage(now),
                }]
            }
            Decision::Follow(to) => {
                self.state = MinionState::Following;
                self.record.current_target = None;
                vec![MinionCommand::MoveTo {
                    minion,
                    to,
                    speed: self.record.inherited_speed,
                }]
            }
            Decision::Idle => {
                self.state = MinionState::Idle;
                self.record.current_target = None;
                if was_following {
                    vec![MinionCommand::StopMoving { minion }]
                } else {
                    Vec::new()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::minion::MinionSeed;
    use crate::types::Direction;
    use crate::world::EntityTags;

    #[derive(Default)]
    struct TestWorld {
        players: HashMap<PlayerId, PlayerView>,
        entities: HashMap<EntityId, EntitySnapshot>,
    }

    impl WorldView for TestWorld {
        fn player(&self, id: PlayerId) -> Option<PlayerView> {
            self.players.get(&id).cloned()
        }

        fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
            self.entities.get(&id).cloned()
        }

        fn entities_near(&self, center: &Position, radius: f64) -> Vec<EntitySnapshot> {
            self.entities
                .values()
                .filter(|e| e.position.distance_to(center) <= radius)
                .cloned()
                .collect()
        }
    }

    const OWNER: PlayerId = PlayerId(1);
    const MINION: EntityId = EntityId(100);

    fn entity(id: u32, x: f64, tags: EntityTags, owner: Option<PlayerId>) -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId(id),
            archetype: "minecraft:zombie".into(),
            position: Position::new(x, 64.0, 0.0),
            health: 20.0,
            max_health: 20.0,
            attack_damage: 3.0,
            speed: 0.25,
            alive: true,
            tags,
            owner,
        }
    }

    fn world_with_owner_at(x: f64) -> TestWorld {
        let mut world = TestWorld::default();
        world.players.insert(
            OWNER,
            PlayerView {
                id: OWNER,
                entity: EntityId(1),
                position: Position::new(x, 64.0, 0.0),
                look: Direction::default(),
                health: 20.0,
                max_health: 20.0,
            },
        );
        world
            .entities
            .insert(MINION, entity(MINION.0, 0.0, EntityTags::MINION, Some(OWNER)));
        world
    }

    fn controller() -> MinionController {
        let seed = MinionSeed {
            owner: OWNER,
            corpse: EntityId(50),
            source_archetype: "minecraft:zombie".into(),
            source_max_health: 20.0,
            source_damage: 4.0,
            source_speed: 0.25,
            position: Position::ORIGIN,
            extraction_level: 0,
        };
        let config = MinionConfig::default();
        MinionController::new(MinionRecord::inherit(MINION, &seed, &config, Tick(0)), Tick(0))
    }

    #[test]
    fn dissipates_after_owner_absent_past_timeout() {
        let config = MinionConfig::default();
        let brain = MinionBrain::new();
        let world = world_with_owner_at(0.0);
        let empty = TestWorld::default();
        let mut minion = controller();

        minion.tick(&world, &brain, &config, Tick(10));
        assert!(minion.tick(&empty, &brain, &config, Tick(6010)).is_empty());
        assert_eq!(minion.state(), MinionState::Idle);

        let commands = minion.tick(&empty, &brain, &config, Tick(6011));
        assert_eq!(commands, vec![MinionCommand::Remove { minion: MINION }]);
        assert!(minion.is_dissipated());
        assert!(minion.tick(&world, &brain, &config, Tick(6012)).is_empty());
    }

    #[test]
    fn never_targets_owner_or_siblings() {
        let config = MinionConfig::default();
        let brain = MinionBrain::new();
        let mut world = world_with_owner_at(2.0);
        world
            .entities
            .insert(EntityId(1), entity(1, 2.0, EntityTags::PLAYER | EntityTags::HOSTILE, None));
        world.entities.insert(
            EntityId(101),
            entity(101, 1.0, EntityTags::MINION | EntityTags::HOSTILE, Some(OWNER)),
        );
        let mut minion = controller();
        let commands = minion.tick(&world, &brain, &config, Tick(1));
        assert!(commands.is_empty());
        assert_eq!(minion.state(), MinionState::Idle);
        assert_eq!(minion.record().current_target, None);
    }

    #[test]
    fn defends_owner_and_respects_think_interval() {
        let config = MinionConfig::default();
        let brain = MinionBrain::new();
        let mut world = world_with_owner_at(2.0);
        world
            .entities
            .insert(EntityId(7), entity(7, 5.0, EntityTags::HOSTILE, None));
        world
            .entities
            .insert(EntityId(8), entity(8, 1.0, EntityTags::HOSTILE, None));
        let mut minion = controller();

        minion.note_owner_attacked(EntityId(7), Tick(0));
        let commands = minion.tick(&world, &brain, &config, Tick(1));
        assert_eq!(minion.state(), MinionState::Defending);
        assert!(matches!(
            commands.as_slice(),
            [MinionCommand::Attack { target: EntityId(7), .. }]
        ));

        assert!(minion.tick(&world, &brain, &config, Tick(5)).is_empty());

        world.entities.remove(&EntityId(7));
        minion.tick(&world, &brain, &config, Tick(11));
        assert_eq!(minion.state(), MinionState::Attacking);
        assert_eq!(minion.record().current_target, Some(EntityId(8)));
    }

    #[test]
    fn follows_distant_owner_then_stops() {
        let config = MinionConfig::default();
        let brain = MinionBrain::new();
        let mut minion = controller();

        let far = world_with_owner_at(15.0);
        let commands = minion.tick(&far, &brain, &config, Tick(1));
        assert_eq!(minion.state(), MinionState::Following);
        assert!(matches!(commands.as_slice(), [MinionCommand::MoveTo { .. }]));

        let near = world_with_owner_at(1.0);
        let commands = minion.tick(&near, &brain, &config, Tick(11));
        assert_eq!(commands, vec![MinionCommand::StopMoving { minion: MINION }]);
        assert_eq!(minion.state(), MinionState::Idle);
    }

    #[test]
    fn command_buff_expires() {
        let mut minion = controller();
        let base = minion.attack_damage(Tick(0));
        minion.apply_buff(ArmyBuff {
            damage_multiplier: 1.5,
            until: Tick(100),
        });
        assert!((minion.attack_damage(Tick(50)) - base * 1.5).abs() < 1e-5);
        assert_eq!(minion.attack_damage(Tick(100)), base);
    }
}
