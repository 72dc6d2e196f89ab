//! Decision tree for shadow soldiers.
//!
//! ```text
//! Selector
//! ├── Guard(owner attacked nearby)  → Defend(attacker)
//! ├── Guard(current target valid)   → Attack(current)
//! ├── nearest valid hostile         → Attack(nearest)
//! ├── Guard(owner too far)          → Follow(owner)
//! └── Idle
//! ```
//!
//! Dissipation is not part of the tree: the controller checks owner absence
//! on every tick, while the tree only runs once per think window.

use behavior_tree::builder::{action, condition, guarded, selector};
use behavior_tree::{Behavior, Node, Status};

use crate::config::MinionConfig;
use crate::types::{EntityId, Position};
use crate::world::EntitySnapshot;

/// Outcome of one think.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    Defend(EntityId),
    Attack(EntityId),
    Follow(Position),
    Idle,
}

/// Everything the tree reads, gathered by the controller before a think.
///
/// Candidates are already filtered for validity (alive, in range, not the
/// owner, not a sibling minion).
#[derive(Clone, Debug)]
pub struct Blackboard {
    pub config: MinionConfig,
    pub position: Position,
    pub owner_position: Position,
    /// The minion was following when this think started.
    pub following: bool,
    /// Recent attacker of the owner, if it is still a valid target.
    pub owner_attacker: Option<EntitySnapshot>,
    /// The previous target, if it is still a valid target.
    pub current_target: Option<EntitySnapshot>,
    /// Valid hostile candidates within the search radius.
    pub hostiles: Vec<EntitySnapshot>,
    pub decision: Option<Decision>,
}

impl Blackboard {
    pub fn owner_distance(&self) -> f64 {
        self.position.distance_to(&self.owner_position)
    }

    /// Nearest hostile; equal distances resolve to the lower entity id.
    pub fn nearest_hostile(&self) -> Option<&EntitySnapshot> {
        self.hostiles.iter().min_by(|a, b| {
            let da = self.position.distance_squared(&a.position);
            let db = self.position.distance_squared(&b.position);
            da.total_cmp(&db).then(a.id.cmp(&b.id))
        })
    }

    fn should_follow(&self) -> bool {
        let distance = self.owner_distance();
        distance > self.config.follow_start_distance
            || (self.following && distance > self.config.follow_stop_distance)
    }

    fn decide(&mut self, decision: Decision) -> Status {
        self.decision = Some(decision);
        Status::Success
    }
}

/// Shared, stateless decision tree. One instance serves every minion.
pub struct MinionBrain {
    root: Node<Blackboard>,
}

impl MinionBrain {
    pub fn new() -> Self {
        let root = selector(vec![
            guarded(
                condition(|bb: &Blackboard| bb.owner_attacker.is_some()),
                action(|bb: &mut Blackboard| match bb.owner_attacker.as_ref().map(|e| e.id) {
                    Some(id) => bb.decide(Decision::Defend(id)),
                    None => Status::Failure,
                }),
            ),
            guarded(
                condition(|bb: &Blackboard| bb.current_target.is_some()),
                action(|bb: &mut Blackboard| match bb.current_target.as_ref().map(|e| e.id) {
                    Some(id) => bb.decide(Decision::Attack(id)),
                    None => Status::Failure,
                }),
            ),
            action(|bb: &mut Blackboard| match bb.nearest_hostile().map(|e| e.id) {
                Some(id) => bb.decide(Decision::Attack(id)),
                None => Status::Failure,
            }),
            guarded(
                condition(Blackboard::should_follow),
                action(|bb: &mut Blackboard| {
                    let to = bb.owner_position;
                    bb.decide(Decision::Follow(to))
                }),
            ),
            action(|bb: &mut Blackboard| bb.decide(Decision::Idle)),
        ]);
        Self { root }
    }

    pub fn think(&self, blackboard: &mut Blackboard) -> Decision {
        blackboard.decision = None;
        self.root.tick(blackboard);
        blackboard.decision.unwrap_or(Decision::Idle)
    }
}

impl Default for MinionBrain {
    fn default() -> Self {
        Self::new()
    }
}
