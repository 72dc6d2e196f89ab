//! On-disk shape of one player's progression.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use monarch_core::{
    BaseStats, ProgressionConfig, ProgressionRecord, SkillBook, SkillId, SkillInstance,
    SkillRegistry, Tick,
};

use crate::storage::ItemStorage;

/// Persisted player document.
///
/// Field names are part of the save format and must not change. Skill
/// cooldown stamps are session ticks and are deliberately not stored; a
/// rejoining player starts with every skill ready.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaveData {
    pub level: u32,
    pub experience: u64,
    pub experience_to_next: u64,
    pub stat_points: u32,
    pub strength: u32,
    pub agility: u32,
    pub sense: u32,
    pub vitality: u32,
    pub intelligence: u32,
    pub mana: f32,
    pub max_mana: f32,
    pub title: String,
    pub last_message: String,
    pub last_message_time: u64,
    pub monarch_unlocked: bool,
    #[serde(default)]
    pub skills: BTreeMap<String, u32>,
    #[serde(default)]
    pub storage: ItemStorage,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SaveData {
    /// Captures the persistent part of a live player.
    pub fn capture(record: &ProgressionRecord, book: &SkillBook, storage: &ItemStorage) -> Self {
        let stats = record.stats();
        Self {
            level: record.level(),
            experience: record.experience(),
            experience_to_next: record.experience_to_next(),
            stat_points: record.stat_points(),
            strength: stats.strength,
            agility: stats.agility,
            sense: stats.sense,
            vitality: stats.vitality,
            intelligence: stats.intelligence,
            mana: record.mana(),
            max_mana: record.max_mana(),
            title: record.title().to_string(),
            last_message: record.last_message().to_string(),
            last_message_time: record.last_message_at().0,
            monarch_unlocked: record.monarch_unlocked(),
            skills: book
                .iter()
                .filter(|s| s.level > 0)
                .map(|s| (s.skill_id.as_str().to_string(), s.level))
                .collect(),
            storage: storage.clone(),
            saved_at: Some(Utc::now()),
        }
    }

    pub fn stats(&self) -> BaseStats {
        BaseStats {
            strength: self.strength,
            agility: self.agility,
            sense: self.sense,
            vitality: self.vitality,
            intelligence: self.intelligence,
        }
    }

    /// Rebuilds live state from the document.
    ///
    /// `ExperienceToNext` and `MaxMana` are recomputed from the current
    /// config rather than trusted. Skills the registry no longer knows are
    /// dropped and levels above the catalog maximum are clamped.
    pub fn restore(
        &self,
        config: &ProgressionConfig,
        registry: &SkillRegistry,
    ) -> (ProgressionRecord, SkillBook, ItemStorage) {
        let record = ProgressionRecord::restore(
            config,
            self.level,
            self.experience,
            self.stat_points,
            self.stats(),
            self.mana,
            self.title.clone(),
            self.monarch_unlocked,
            self.last_message.clone(),
            Tick(self.last_message_time),
        );

        let mut book = SkillBook::new();
        for (id, level) in &self.skills {
            let Some(definition) = registry.get(id) else {
                warn!(target: "runtime::repository", skill = %id, "dropping unknown skill from save");
                continue;
            };
            let instance = SkillInstance {
                skill_id: SkillId::new(id.as_str()),
                level: (*level).min(definition.max_level),
                last_activated_at: None,
            };
            if let Err(err) = book.insert(instance) {
                warn!(target: "runtime::repository", skill = %id, error = %err, "skipping saved skill");
            }
        }

        (record, book, self.storage.clone())
    }
}

#[cfg(test)]
mod tests {
    use monarch_content::ContentFactory;
    use monarch_core::GameConfig;

    use super::*;
    use crate::storage::ItemStack;

    #[test]
    fn field_names_are_fixed() {
        let config = GameConfig::default();
        let record = ProgressionRecord::new(&config.progression);
        let data = SaveData::capture(&record, &SkillBook::new(), &ItemStorage::new());
        let json = serde_json::to_value(&data).unwrap();
        let object = json.as_object().unwrap();
        for key in [
            "Level",
            "Experience",
            "ExperienceToNext",
            "StatPoints",
            "Strength",
            "Agility",
            "Sense",
            "Vitality",
            "Intelligence",
            "Mana",
            "MaxMana",
            "Title",
            "LastMessage",
            "LastMessageTime",
            "MonarchUnlocked",
            "Skills",
            "SavedAt",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn capture_then_restore_keeps_everything() {
        let content = ContentFactory::bundled().unwrap();
        let cfg = &content.config.progression;
        let mut record = ProgressionRecord::new(cfg);
        record.add_experience(cfg, 1_234, Tick(77));
        record.allocate_stat_point(cfg, "intelligence").unwrap();
        record.consume_resource(12.5).unwrap();

        let mut book = SkillBook::new();
        book.insert(SkillInstance {
            skill_id: SkillId::from("shadow_strike"),
            level: 3,
            last_activated_at: Some(Tick(50)),
        })
        .unwrap();
        let mut storage = ItemStorage::new();
        storage.store(ItemStack::new("minecraft:diamond", 4)).unwrap();

        let data = SaveData::capture(&record, &book, &storage);
        let text = serde_json::to_string(&data).unwrap();
        let parsed: SaveData = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, data);

        let (restored, restored_book, restored_storage) = parsed.restore(cfg, &content.skills);
        assert_eq!(restored, record);
        assert_eq!(restored_storage, storage);
        let strike = restored_book.get(&SkillId::from("shadow_strike")).unwrap();
        assert_eq!(strike.level, 3);
        assert_eq!(strike.last_activated_at, None);
    }

    #[test]
    fn unknown_skills_are_dropped_and_levels_clamped() {
        let content = ContentFactory::bundled().unwrap();
        let cfg = &content.config.progression;
        let record = ProgressionRecord::new(cfg);
        let mut data = SaveData::capture(&record, &SkillBook::new(), &ItemStorage::new());
        data.skills.insert("retired_skill".into(), 4);
        data.skills.insert("shadow_dash".into(), 999);

        let (_, book, _) = data.restore(cfg, &content.skills);
        assert!(book.get(&SkillId::from("retired_skill")).is_none());
        let max = content.skills.get("shadow_dash").unwrap().max_level;
        assert_eq!(book.get(&SkillId::from("shadow_dash")).unwrap().level, max);
    }

    #[test]
    fn older_saves_without_optional_fields_load() {
        let text = r#"{
            "Level": 3, "Experience": 10, "ExperienceToNext": 700, "StatPoints": 10,
            "Strength": 10, "Agility": 10, "Sense": 10, "Vitality": 10, "Intelligence": 10,
            "Mana": 100.0, "MaxMana": 100.0, "Title": "Hunter", "LastMessage": "",
            "LastMessageTime": 0, "MonarchUnlocked": false
        }"#;
        let data: SaveData = serde_json::from_str(text).unwrap();
        assert!(data.skills.is_empty());
        assert!(data.storage.is_empty());
        assert!(data.saved_at.is_none());
    }
}
