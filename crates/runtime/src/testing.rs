//! Scriptable host for unit tests.

use std::collections::BTreeMap;

use monarch_core::{
    Corpse, Direction, EntityId, EntitySnapshot, EntityTags, MinionCommand, MinionRecord,
    MinionSeed, PlayerId, PlayerView, Position, WorldCommand, WorldView,
};

use crate::host::WorldHost;
use crate::storage::ItemStack;

pub struct TestHost {
    pub players: BTreeMap<PlayerId, PlayerView>,
    pub entities: BTreeMap<EntityId, EntitySnapshot>,
    pub corpses: Vec<Corpse>,
    pub applied: Vec<WorldCommand>,
    pub minion_commands: Vec<MinionCommand>,
    pub inventories: BTreeMap<PlayerId, Vec<ItemStack>>,
    pub refuse_spawns: bool,
    next_entity: u32,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            players: BTreeMap::new(),
            entities: BTreeMap::new(),
            corpses: Vec::new(),
            applied: Vec::new(),
            minion_commands: Vec::new(),
            inventories: BTreeMap::new(),
            refuse_spawns: false,
            next_entity: 1_000,
        }
    }

    /// Puts an online player at `position`, looking along +x.
    pub fn add_player(&mut self, id: PlayerId, position: Position) -> PlayerView {
        let view = PlayerView {
            id,
            entity: EntityId(id.0 as u32),
            position,
            look: Direction::normalized(1.0, 0.0, 0.0).unwrap_or_default(),
            health: 20.0,
            max_health: 20.0,
        };
        self.players.insert(id, view.clone());
        view
    }

    pub fn add_mob(&mut self, archetype: &str, position: Position, max_health: f32) -> EntityId {
        let id = self.allocate();
        self.entities.insert(
            id,
            EntitySnapshot {
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
            },
        );
        id
    }

    pub fn add_corpse(&mut self, archetype: &str, position: Position) -> EntityId {
        let entity = self.allocate();
        self.corpses.push(Corpse {
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

    fn allocate(&mut self) -> EntityId {
        self.next_entity += 1;
        EntityId(self.next_entity)
    }
}

impl WorldView for TestHost {
    fn player(&self, id: PlayerId) -> Option<PlayerView> {
        self.players.get(&id).cloned()
    }

    fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.entities.get(&id).cloned()
    }

    fn entities_near(&self, center: &Position, radius: f64) -> Vec<EntitySnapshot> {
        self.entities
            .values()
            .filter(|e| e.alive && e.position.distance_to(center) <= radius)
            .cloned()
            .collect()
    }

    fn corpses_near(&self, center: &Position, radius: f64) -> Vec<Corpse> {
        self.corpses
            .iter()
            .filter(|c| c.position.distance_to(center) <= radius)
            .cloned()
            .collect()
    }
}

impl WorldHost for TestHost {
    fn apply(&mut self, command: WorldCommand) {
        if let WorldCommand::ConsumeCorpse { entity } = &command {
            self.corpses.retain(|c| c.entity != *entity);
        }
        self.applied.push(command);
    }

    fn command_minion(&mut self, command: MinionCommand) {
        self.minion_commands.push(command);
    }

    fn spawn_minion(&mut self, seed: &MinionSeed, record: &MinionRecord) -> Option<EntityId> {
        if self.refuse_spawns {
            return None;
        }
        let id = self.allocate();
        self.entities.insert(
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
        let Some(inventory) = self.inventories.get_mut(&player) else {
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
        self.inventories.entry(player).or_default().push(item);
    }
}
