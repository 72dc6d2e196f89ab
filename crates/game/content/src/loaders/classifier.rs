//! Entity classification loader.

use std::path::Path;

use monarch_core::EntityClassifier;

use crate::loaders::{LoadResult, read_file};

/// Loader for boss/elite archetype lists from RON files.
pub struct ClassifierLoader;

impl ClassifierLoader {
    pub fn load(path: &Path) -> LoadResult<EntityClassifier> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<EntityClassifier> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse classifier RON: {}", e))
    }
}
