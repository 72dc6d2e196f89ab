//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod clean;
mod content;
mod read_save;
mod skill_table;
mod xp_table;

pub use clean::Clean;
pub use read_save::ReadSave;
pub use skill_table::SkillTable;
pub use xp_table::XpTable;
