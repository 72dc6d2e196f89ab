//! Skill catalog loader.

use std::path::Path;

use monarch_core::{SkillDefinition, SkillRegistry};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillDefinition>,
}

/// Loader for the skill catalog from RON files.
pub struct SkillCatalogLoader;

impl SkillCatalogLoader {
    /// Load the catalog from a RON file and build the registry.
    pub fn load(path: &Path) -> LoadResult<SkillRegistry> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse catalog text and build the registry.
    pub fn parse(content: &str) -> LoadResult<SkillRegistry> {
        let catalog: SkillCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        SkillRegistry::new(catalog.skills)
            .map_err(|e| anyhow::anyhow!("Invalid skill catalog: {}", e))
    }
}
