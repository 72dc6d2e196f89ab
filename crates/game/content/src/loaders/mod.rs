//! Content loaders for reading game data from files.
//!
//! Every loader offers `load(path)` for data on disk and `parse(text)` for
//! data already in memory (the bundled defaults use the latter).

pub mod classifier;
pub mod config;
pub mod factory;
pub mod skills;

pub use classifier::ClassifierLoader;
pub use config::ConfigLoader;
pub use factory::{Content, ContentFactory};
pub use skills::{SkillCatalog, SkillCatalogLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
