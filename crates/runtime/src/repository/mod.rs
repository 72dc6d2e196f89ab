//! Persistence of player progression between sessions.
//!
//! The authority converts a live [`crate::authority::PlayerCapability`] into
//! a [`SaveData`] on leave (and on autosave) and back on join. Repositories
//! only move those documents around; they never see live state.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepository;
pub use traits::PlayerRepository;
pub use types::SaveData;
