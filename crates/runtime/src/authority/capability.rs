//! The authoritative per-player bundle.

use monarch_core::{
    PlayerId, ProgressionConfig, ProgressionRecord, SkillBook, SkillRegistry, Tick,
};

use crate::protocol::Snapshot;
use crate::repository::SaveData;
use crate::storage::ItemStorage;

/// Progression record, skill book and item storage of one joined player.
///
/// Exactly one exists per player on the authoritative side. Every mutation
/// marks it dirty; [`super::Authority::flush`] turns dirty capabilities into
/// snapshots.
#[derive(Debug, Clone)]
pub struct PlayerCapability {
    pub(crate) record: ProgressionRecord,
    pub(crate) skills: SkillBook,
    pub(crate) storage: ItemStorage,
    dirty: bool,
    last_regen: Tick,
}

impl PlayerCapability {
    /// A first-time player.
    pub fn new(config: &ProgressionConfig, now: Tick) -> Self {
        Self {
            record: ProgressionRecord::new(config),
            skills: SkillBook::new(),
            storage: ItemStorage::new(),
            dirty: true,
            last_regen: now,
        }
    }

    /// A returning player.
    pub fn from_save(
        data: &SaveData,
        config: &ProgressionConfig,
        registry: &SkillRegistry,
        now: Tick,
    ) -> Self {
        let (record, skills, storage) = data.restore(config, registry);
        Self {
            record,
            skills,
            storage,
            dirty: true,
            last_regen: now,
        }
    }

    pub fn to_save(&self) -> SaveData {
        SaveData::capture(&self.record, &self.skills, &self.storage)
    }

    pub fn record(&self) -> &ProgressionRecord {
        &self.record
    }

    pub fn skills(&self) -> &SkillBook {
        &self.skills
    }

    pub fn storage(&self) -> &ItemStorage {
        &self.storage
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Restores mana if a full regeneration interval has passed.
    ///
    /// Returns true if the pool changed.
    pub(crate) fn regenerate(&mut self, config: &ProgressionConfig, now: Tick) -> bool {
        if now.since(self.last_regen) < config.mana_regen_interval.max(1) {
            return false;
        }
        self.last_regen = now;
        let before = self.record.mana();
        let rate = self.record.regeneration_rate(config);
        self.record.regenerate_resource(rate);
        if self.record.mana() > before {
            self.dirty = true;
            return true;
        }
        false
    }

    pub fn snapshot(
        &self,
        player: PlayerId,
        config: &ProgressionConfig,
        army_size: u32,
        now: Tick,
    ) -> Snapshot {
        Snapshot {
            player,
            record: self.record.clone(),
            max_health: self.record.max_health(config),
            skills: self.skills.clone(),
            storage: self.storage.clone(),
            army_size,
            taken_at: now,
        }
    }
}
