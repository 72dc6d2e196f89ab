//! Shared in-memory host for the runtime integration tests.
//!
//! The world lives behind a mutex so the test keeps a handle to it after the
//! host has been moved into the simulation worker.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use monarch_core::{
    Corpse, Direction, EntityId, EntitySnapshot, EntityTags, MinionCommand, MinionRecord,
    MinionSeed, PlayerId, PlayerView, Position, WorldCommand, WorldView,
};
use monarch_runtime::{ItemStack, WorldHost};
use tracing_subscriber::EnvFilter;

/// Routes runtime logs to the test output; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct World {
    pub players: BTreeMap<PlayerId, PlayerView>,
    pub entities: BTreeMap<EntityId, EntitySnapshot>,
    pub corpses: Vec<Corpse>,
    pub applied: Vec<WorldCommand>,
    pub minion_commands: Vec<MinionCommand>,
    pub inventories: BTreeMap<PlayerId, Vec<ItemStack>>,
    next_entity: u32,
}

impl World {
    fn allocate(&mut self) -> EntityId {
        self.next_entity += 1;
        EntityId(5_000 + self.next_entity)
    }
}

#[derive(Clone, Default)]
pub struct SharedHost(Arc<Mutex<World>>);

impl SharedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(&self) -> MutexGuard<'_, World> {
        self.0.lock().expect("world lock poisoned")
    }

    pub fn add_player(&self, id: PlayerId, position: Position) {
        let view = PlayerView {
            id,
            entity: EntityId(id.0 as u32),
            position,
            look: Direction::normalized(1.0, 0.0, 0.0).unwrap_or_default(),
            health: 20.0,
            max_health: 20.0,
        };
        self.world().players.insert(id, view);
    }

    pub fn remove_player(&self, id: PlayerId) {
        self.world().players.remove(&id);
    }

    pub fn add_mob(&self, archetype: &str, position: Position, max_health: f32) -> EntitySnapshot {
        let mut world = self.world();
        let id = world.allocate();
        let snapshot = EntitySnapshot {
            id,
            archetype: archetype.into(),
            position,
            health: max_health,
            max_health,
            attack_damage: 4.0,
            speed: 0.25,
            alive: true,
            tags: EntityTags::HOSTILE,
            owner: None,
        };
        world.entities.insert(id, snapshot.clone());
        snapshot
    }

    pub fn add_corpse(&self, archetype: &str, position: Position) -> EntityId {
        let mut world = self.world();
        let entity = world.allocate();
        world.corpses.push(Corpse {
            entity,
            archetype: archetype.into(),
            position,
            max_health: 20.0,
            attack_damage: 3.0,
            speed: 0.25,
            died_at: Default::default(),
        });
        entity
    }

    pub fn give(&self, player: PlayerId, item: ItemStack) {
        self.world().inventories.entry(player).or_default().push(item);
    }
}

impl WorldView for SharedHost {
    fn player(&self, id: PlayerId) -> Option<PlayerView> {
        self.world().players.get(&id).cloned()
    }

    fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.world().entities.get(&id).cloned()
    }

    fn entities_near(&self, center: &Position, radius: f64) -> Vec<EntitySnapshot> {
        self.world()
            .entities
            .values()
            .filter(|e| e.alive && e.position.distance_to(center) <= radius)
            .cloned()
            .collect()
    }

    fn corpses_near(&self, center: &Position, radius: f64) -> Vec<Corpse> {
        self.world()
            .corpses
            .iter()
            .filter(|c| c.position.distance_to(center) <= radius)
            .cloned()
            .collect()
    }
}

impl WorldHost for SharedHost {
    fn apply(&mut self, command: WorldCommand) {
        let mut world = self.world();
        if let WorldCommand::ConsumeCorpse { entity } = &command {
            world.corpses.retain(|c| c.entity != *entity);
        }
        world.applied.push(command);
    }

    fn command_minion(&mut self, command: MinionCommand) {
        self.world().minion_commands.push(command);
    }

    fn spawn_minion(&mut self, seed: &MinionSeed, record: &MinionRecord) -> Option<EntityId> {
        let mut world = self.world();
        let id = world.allocate();
        world.entities.insert(
            id,
            EntitySnapshot {
                id,
                archetype: record.source_archetype.clone(),
                position: seed.position,
                health: record.inherited_health,
                max_health: record.inherited_health,
                attack_damage: record.inherited_damage,
                speed: record.inherited_speed,
                alive: true,
                tags: EntityTags::MINION,
                owner: Some(record.owner),
            },
        );
        Some(id)
    }

    fn take_item(&mut self, player: PlayerId, item: &ItemStack) -> bool {
        let mut world = self.world();
        let Some(inventory) = world.inventories.get_mut(&player) else {
            return false;
        };
        match inventory.iter().position(|s| s == item) {
            Some(index) => {
                inventory.remove(index);
                true
            }
            None => false,
        }
    }

    fn give_item(&mut self, player: PlayerId, item: ItemStack) {
        self.world().inventories.entry(player).or_default().push(item);
    }
}
