//! Skills: catalog definitions, per-player levels and the activation protocol.
//!
//! [`SkillRegistry`] holds the immutable catalog; each player owns a
//! [`SkillBook`]. Activation mutates only the caster's record and book and
//! returns world effects for the host to apply.

mod book;
mod definition;
mod effects;
mod error;
mod registry;

pub use book::{SkillBook, SkillInstance};
pub use definition::{
    AuthorityParams, BloodlustParams, CommandParams, DashParams, ExtractionParams, InsightParams,
    PurificationParams, RecoveryParams, SkillDefinition, SkillId, SkillKind, SkillScaling,
    StrikeParams,
};
pub use effects::ActivationContext;
pub use error::{Precondition, SkillError};
pub use registry::{Activation, CatalogError, SkillRegistry, SkillUpgrade};
