//! Player progression: level, experience, stat points and the mana pool.
//!
//! ```text
//! experience ──▶ level-ups ──▶ stat points ──▶ base stats ──▶ derived maxima
//! ```
//!
//! [`ProgressionRecord`] is the single source of truth for these numbers on
//! the authoritative side; [`ExperienceCurve`] is the tunable level table.

mod curve;
mod error;
mod record;
mod stats;

pub use curve::{CurveError, CurveSegment, ExperienceCurve, SegmentShape};
pub use error::ProgressionError;
pub use record::{LevelUpSummary, ProgressionRecord, StatAllocation};
pub use stats::{BaseStats, DerivedKind, StatKind};
