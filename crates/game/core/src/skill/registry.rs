//! The skill catalog and the activation/upgrade protocols.

use std::collections::BTreeMap;

use crate::minion::{ArmyBuff, MinionSeed};
use crate::progression::{ProgressionError, ProgressionRecord};
use crate::world::WorldCommand;

use super::book::SkillBook;
use super::effects::{self, ActivationContext};
use super::{SkillDefinition, SkillError, SkillId};

/// Rejected catalog contents.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("skill '{0}' is defined twice")]
    Duplicate(SkillId),
    #[error("skill '{0}' has invalid cost/cooldown scaling")]
    InvalidScaling(SkillId),
    #[error("skill '{0}' must have max_level >= 1")]
    InvalidMaxLevel(SkillId),
}

/// A committed activation.
#[derive(Clone, Debug, PartialEq)]
pub struct Activation {
    pub skill: SkillId,
    pub level: u32,
    /// Mana that was spent.
    pub cost: f32,
    pub commands: Vec<WorldCommand>,
    /// Present when an extraction raised a shadow.
    pub spawned: Option<MinionSeed>,
    pub buff: Option<ArmyBuff>,
}

/// A committed skill level-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillUpgrade {
    pub skill: SkillId,
    pub new_level: u32,
    pub points_left: u32,
}

/// Immutable catalog of every skill, built once at startup.
#[derive(Clone, Debug, Default)]
pub struct SkillRegistry {
    skills: Vec<SkillDefinition>,
    index: BTreeMap<SkillId, usize>,
}

impl SkillRegistry {
    pub fn new(definitions: Vec<SkillDefinition>) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (i, def) in definitions.iter().enumerate() {
            if !def.scaling.is_valid() {
                return Err(CatalogError::InvalidScaling(def.id.clone()));
            }
            if def.max_level == 0 {
                return Err(CatalogError::InvalidMaxLevel(def.id.clone()));
            }
            if index.insert(def.id.clone(), i).is_some() {
                return Err(CatalogError::Duplicate(def.id.clone()));
            }
        }
        Ok(Self {
            skills: definitions,
            index,
        })
    }

    pub fn get(&self, id: &str) -> Option<&SkillDefinition> {
        self.index.get(id).map(|&i| &self.skills[i])
    }

    /// Definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.iter()
    }

    pub fn passives(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.iter().filter(|d| d.is_passive())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Runs the activation protocol for one active skill.
    ///
    /// Checks run in order: known and active, learned, off cooldown, mana
    /// spent, world preconditions. A failing precondition refunds the mana.
    /// Only a committed activation stamps the cooldown.
    pub fn activate(
        &self,
        id: &SkillId,
        book: &mut SkillBook,
        record: &mut ProgressionRecord,
        ctx: &ActivationContext<'_>,
    ) -> Result<Activation, SkillError> {
        let definition = self
            .get(id.as_str())
            .ok_or_else(|| SkillError::UnknownSkill(id.clone()))?;
        if definition.is_passive() {
            return Err(SkillError::NotActive(id.clone()));
        }

        let level = book.level_of(definition);
        if level == 0 {
            return Err(SkillError::NotUnlocked(id.clone()));
        }

        if let Some(instance) = book.get(id) {
            let remaining = instance.cooldown_remaining(definition, ctx.now);
            if remaining > 0 {
                return Err(SkillError::OnCooldown {
                    skill: id.clone(),
                    remaining_ticks: remaining,
                });
            }
        }

        let cost = definition.cost(level);
        let mana_before = record.mana();
        record.consume_resource(cost).map_err(|err| match err {
            ProgressionError::InsufficientResource {
                required,
                available,
            } => SkillError::InsufficientResource {
                required,
                available,
            },
            _ => SkillError::InsufficientResource {
                required: cost,
                available: mana_before,
            },
        })?;

        let resolved = match effects::resolve(definition, level, record.stats(), ctx) {
            Ok(resolved) => resolved,
            Err(reason) => {
                record.refund_resource(mana_before);
                return Err(SkillError::PreconditionFailed(reason));
            }
        };

        let instance = match book.entry(id) {
            Ok(instance) => instance,
            Err(err) => {
                record.refund_resource(mana_before);
                return Err(err);
            }
        };
        instance.last_activated_at = Some(ctx.now);

        Ok(Activation {
            skill: id.clone(),
            level,
            cost,
            commands: resolved.commands,
            spawned: resolved.spawned,
            buff: resolved.buff,
        })
    }

    /// Spends one point to raise a skill by one level.
    pub fn upgrade(
        &self,
        id: &SkillId,
        book: &mut SkillBook,
        record: &mut ProgressionRecord,
    ) -> Result<SkillUpgrade, SkillError> {
        let definition = self
            .get(id.as_str())
            .ok_or_else(|| SkillError::UnknownSkill(id.clone()))?;

        let current = book.level_of(definition);
        if current >= definition.max_level {
            return Err(SkillError::AlreadyMaxLevel {
                skill: id.clone(),
                max_level: definition.max_level,
            });
        }
        if record.level() < definition.unlock_level {
            return Err(SkillError::PlayerLevelTooLow {
                skill: id.clone(),
                required: definition.unlock_level,
            });
        }
        if record.stat_points() == 0 {
            return Err(SkillError::NoSkillPoints);
        }

        let instance = book.entry(id)?;
        record
            .spend_stat_point()
            .map_err(|_| SkillError::NoSkillPoints)?;
        instance.level = current + 1;

        Ok(SkillUpgrade {
            skill: id.clone(),
            new_level: instance.level,
            points_left: record.stat_points(),
        })
    }
}
