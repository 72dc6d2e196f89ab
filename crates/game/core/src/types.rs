//! Identifiers, time, and spatial primitives shared by every subsystem.
//!
//! Entities and players are owned by the host engine. The core only keeps
//! opaque, stable identifiers and resolves them through world views when it
//! needs to look at the live object.

use std::fmt;

/// Stable identifier of a player across sessions (the host's account/UUID key).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player:{}", self.0)
    }
}

/// Identifier of a live engine entity (mob, minion, player body).
///
/// Entity ids are only meaningful while the host keeps the entity loaded, so
/// they are never treated as owning references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete game step driven by the host simulation loop.
///
/// All cooldowns and timeouts are measured in ticks so they stay in lockstep
/// with the single-threaded simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Ticks elapsed since `earlier`, saturating at zero if `earlier` is in the future.
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_add(rhs))
    }
}

impl std::ops::Sub<u64> for Tick {
    type Output = Tick;
    fn sub(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_sub(rhs))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Continuous world position in blocks.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance between two positions.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Offset this position by `direction * distance`.
    pub fn offset(&self, direction: &Direction, distance: f64) -> Position {
        Position {
            x: self.x + direction.x * distance,
            y: self.y + direction.y * distance,
            z: self.z + direction.z * distance,
        }
    }
}

/// Unit-length direction vector (look direction, knockback direction).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Direction {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Direction {
    /// Normalized direction from `from` to `to`. Returns `None` when the points coincide.
    pub fn between(from: &Position, to: &Position) -> Option<Direction> {
        Self::normalized(to.x - from.x, to.y - from.y, to.z - from.z)
    }

    pub fn normalized(x: f64, y: f64, z: f64) -> Option<Direction> {
        let length = (x * x + y * y + z * z).sqrt();
        if length <= f64::EPSILON {
            return None;
        }
        Some(Direction {
            x: x / length,
            y: y / length,
            z: z / length,
        })
    }
}
