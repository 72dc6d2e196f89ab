//! World effects of active skills.
//!
//! Resolution only reads the world. The resulting [`WorldCommand`]s, spawn
//! seed and army buff are handed back to the caller, which applies them
//! after the activation has been committed.

use crate::config::MinionConfig;
use crate::minion::{ArmyBuff, MinionSeed, army_cap};
use crate::progression::BaseStats;
use crate::rng::{RngOracle, compute_seed, roll};
use crate::types::{Direction, Tick};
use crate::world::{EntitySnapshot, EntityTags, PlayerView, StatusKind, WorldCommand, WorldView};

use super::{Precondition, SkillDefinition, SkillKind};

/// Everything an activation may look at besides the caster's record.
pub struct ActivationContext<'a> {
    pub player: &'a PlayerView,
    pub world: &'a dyn WorldView,
    pub rng: &'a dyn RngOracle,
    pub session_seed: u64,
    pub now: Tick,
    /// Minions the caster currently owns.
    pub army_size: u32,
    pub minions: &'a MinionConfig,
}

#[derive(Debug, Default)]
pub(crate) struct Resolved {
    pub commands: Vec<WorldCommand>,
    pub spawned: Option<MinionSeed>,
    pub buff: Option<ArmyBuff>,
}

impl ActivationContext<'_> {
    /// Living hostiles around the caster, nearest first.
    fn hostiles_within(&self, radius: f64) -> Vec<EntitySnapshot> {
        let origin = self.player.position;
        let mut found: Vec<_> = self
            .world
            .entities_near(&origin, radius)
            .into_iter()
            .filter(|e| {
                e.alive
                    && e.is_hostile()
                    && !e.tags.contains(EntityTags::MINION)
                    && e.id != self.player.entity
            })
            .collect();
        found.sort_by(|a, b| {
            let da = origin.distance_squared(&a.position);
            let db = origin.distance_squared(&b.position);
            da.total_cmp(&db).then(a.id.cmp(&b.id))
        });
        found
    }
}

pub(crate) fn resolve(
    definition: &SkillDefinition,
    level: u32,
    stats: &BaseStats,
    ctx: &ActivationContext<'_>,
) -> Result<Resolved, Precondition> {
    let magnitude = definition.effect_magnitude(level);
    let caster = ctx.player;

    match &definition.kind {
        SkillKind::Strike(p) => {
            let target = ctx
                .hostiles_within(p.range)
                .into_iter()
                .next()
                .ok_or(Precondition::NoTargetInRange)?;
            let amount = magnitude as f32 + stats.strength as f32 * p.strength_scaling;
            Ok(Resolved {
                commands: vec![WorldCommand::Damage {
                    target: target.id,
                    amount,
                    source: caster.id,
                }],
                ..Resolved::default()
            })
        }
        SkillKind::Dash(p) => {
            let look = caster.look;
            let direction = Direction::normalized(look.x, look.y, look.z)
                .ok_or(Precondition::NoLookDirection)?;
            let distance = magnitude + f64::from(stats.agility) * p.agility_scaling;
            Ok(Resolved {
                commands: vec![WorldCommand::Teleport {
                    entity: caster.entity,
                    to: caster.position.offset(&direction, distance),
                }],
                ..Resolved::default()
            })
        }
        SkillKind::Bloodlust(p) => {
            let targets = ctx.hostiles_within(p.radius);
            if targets.is_empty() {
                return Err(Precondition::NoHostilesNearby);
            }
            let duration = magnitude.round() as u64;
            let steps = (level.max(1) - 1) / p.levels_per_amplifier.max(1);
            let amplifier = u8::try_from(steps).unwrap_or(u8::MAX);
            let commands = targets
                .iter()
                .flat_map(|t| {
                    [StatusKind::Slowness, StatusKind::Weakness].map(|status| {
                        WorldCommand::ApplyStatus {
                            target: t.id,
                            status,
                            duration,
                            amplifier,
                        }
                    })
                })
                .collect();
            Ok(Resolved {
                commands,
                ..Resolved::default()
            })
        }
        SkillKind::RulersAuthority(p) => {
            let targets = ctx.hostiles_within(p.radius);
            if targets.is_empty() {
                return Err(Precondition::NoHostilesNearby);
            }
            let commands = targets
                .iter()
                .map(|t| WorldCommand::Knockback {
                    target: t.id,
                    direction: Direction::between(&caster.position, &t.position)
                        .unwrap_or(caster.look),
                    strength: magnitude,
                })
                .collect();
            Ok(Resolved {
                commands,
                ..Resolved::default()
            })
        }
        SkillKind::ShadowCommand(p) => {
            if ctx.army_size == 0 {
                return Err(Precondition::NoMinions);
            }
            Ok(Resolved {
                buff: Some(ArmyBuff {
                    damage_multiplier: magnitude as f32,
                    until: ctx.now + p.duration,
                }),
                ..Resolved::default()
            })
        }
        SkillKind::Extraction(p) => {
            let corpse = ctx
                .world
                .corpses_near(&caster.position, p.range)
                .into_iter()
                .filter(|c| ctx.now.since(c.died_at) <= p.corpse_window)
                .min_by(|a, b| {
                    let da = caster.position.distance_squared(&a.position);
                    let db = caster.position.distance_squared(&b.position);
                    da.total_cmp(&db).then(a.entity.cmp(&b.entity))
                })
                .ok_or(Precondition::NoCorpseInRange)?;

            let cap = army_cap(ctx.minions, stats.intelligence, level);
            if ctx.army_size >= cap {
                return Err(Precondition::ArmyFull { cap });
            }

            let chance = (magnitude + f64::from(stats.sense) * p.chance_per_sense).min(p.max_chance);
            let seed = compute_seed(ctx.session_seed, ctx.now.0, caster.id.0, roll::EXTRACTION);
            if !ctx.rng.roll_chance(seed, chance) {
                // The attempt is spent; the corpse stays for another try.
                return Ok(Resolved::default());
            }
            Ok(Resolved {
                commands: vec![WorldCommand::ConsumeCorpse {
                    entity: corpse.entity,
                }],
                spawned: Some(MinionSeed::from_corpse(caster.id, &corpse, level)),
                buff: None,
            })
        }
        SkillKind::HuntersInsight(_) | SkillKind::Recovery(_) | SkillKind::Purification(_) => {
            Ok(Resolved::default())
        }
    }
}
