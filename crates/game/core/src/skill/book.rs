//! Per-player skill levels and cooldown stamps.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::types::Tick;

use super::{SkillDefinition, SkillError, SkillId};

/// A player's progress in one skill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillInstance {
    pub skill_id: SkillId,
    pub level: u32,
    /// Tick of the last successful activation (or passive trigger).
    pub last_activated_at: Option<Tick>,
}

impl SkillInstance {
    pub fn new(skill_id: SkillId) -> Self {
        Self {
            skill_id,
            level: 0,
            last_activated_at: None,
        }
    }

    /// Level used for formulas; innate skills count as at least level 1.
    pub fn effective_level(&self, definition: &SkillDefinition) -> u32 {
        effective_level(self.level, definition)
    }

    /// Ticks left before the skill is ready again. Zero when ready.
    pub fn cooldown_remaining(&self, definition: &SkillDefinition, now: Tick) -> u64 {
        match self.last_activated_at {
            None => 0,
            Some(at) => definition
                .cooldown(self.effective_level(definition))
                .saturating_sub(now.since(at)),
        }
    }

    pub fn is_ready(&self, definition: &SkillDefinition, now: Tick) -> bool {
        self.cooldown_remaining(definition, now) == 0
    }
}

fn effective_level(level: u32, definition: &SkillDefinition) -> u32 {
    if definition.innate { level.max(1) } else { level }
}

/// Bounded set of [`SkillInstance`]s, one per known skill.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillBook {
    skills: ArrayVec<SkillInstance, { GameConfig::MAX_SKILLS }>,
}

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &SkillId) -> Option<&SkillInstance> {
        self.skills.iter().find(|s| &s.skill_id == id)
    }

    pub fn get_mut(&mut self, id: &SkillId) -> Option<&mut SkillInstance> {
        self.skills.iter_mut().find(|s| &s.skill_id == id)
    }

    /// Effective level of `definition` for this player (0 when unknown and not innate).
    pub fn level_of(&self, definition: &SkillDefinition) -> u32 {
        let level = self.get(&definition.id).map_or(0, |s| s.level);
        effective_level(level, definition)
    }

    /// Returns the instance for `id`, inserting a level-0 entry if absent.
    pub fn entry(&mut self, id: &SkillId) -> Result<&mut SkillInstance, SkillError> {
        let index = match self.skills.iter().position(|s| &s.skill_id == id) {
            Some(index) => index,
            None => {
                self.skills
                    .try_push(SkillInstance::new(id.clone()))
                    .map_err(|_| SkillError::BookFull)?;
                self.skills.len() - 1
            }
        };
        Ok(&mut self.skills[index])
    }

    /// Replaces or inserts an instance wholesale (snapshot apply, save restore).
    pub fn insert(&mut self, instance: SkillInstance) -> Result<(), SkillError> {
        let slot = self.entry(&instance.skill_id)?;
        *slot = instance;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillInstance> {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn clear(&mut self) {
        self.skills.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::{DashParams, SkillKind, SkillScaling};

    fn dash(innate: bool) -> SkillDefinition {
        SkillDefinition {
            id: SkillId::from("dash"),
            name: "Dash".into(),
            description: String::new(),
            unlock_level: 1,
            max_level: 10,
            innate,
            scaling: SkillScaling {
                base_cooldown: 100,
                ..SkillScaling::default()
            },
            kind: SkillKind::Dash(DashParams {
                base_distance: 5.0,
                distance_per_level: 0.5,
                agility_scaling: 0.0,
            }),
        }
    }

    #[test]
    fn innate_skills_count_as_level_one() {
        let book = SkillBook::new();
        assert_eq!(book.level_of(&dash(true)), 1);
        assert_eq!(book.level_of(&dash(false)), 0);
    }

    #[test]
    fn cooldown_counts_down_from_stamp() {
        let def = dash(true);
        let mut instance = SkillInstance::new(def.id.clone());
        assert!(instance.is_ready(&def, Tick(0)));
        instance.last_activated_at = Some(Tick(50));
        assert_eq!(instance.cooldown_remaining(&def, Tick(80)), 70);
        assert!(instance.is_ready(&def, Tick(150)));
    }

    #[test]
    fn book_rejects_overflow() {
        let mut book = SkillBook::new();
        for i in 0..GameConfig::MAX_SKILLS {
            book.entry(&SkillId::new(format!("s{i}"))).unwrap();
        }
        assert!(matches!(
            book.entry(&SkillId::from("one_more")),
            Err(SkillError::BookFull)
        ));
        assert!(book.entry(&SkillId::from("s0")).is_ok());
    }
}
