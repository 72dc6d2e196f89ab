//! Content factory for loading the whole data set at once.

use std::path::{Path, PathBuf};

use monarch_core::{EntityClassifier, GameConfig, SkillRegistry};

use crate::loaders::{ClassifierLoader, ConfigLoader, LoadResult, SkillCatalogLoader};

const BUNDLED_CONFIG: &str = include_str!("../../data/config.toml");
const BUNDLED_SKILLS: &str = include_str!("../../data/skills.ron");
const BUNDLED_CLASSIFIER: &str = include_str!("../../data/classifier.ron");

/// Everything the runtime needs from content, loaded together.
#[derive(Clone, Debug)]
pub struct Content {
    pub config: GameConfig,
    pub skills: SkillRegistry,
    pub classifier: EntityClassifier,
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── skills.ron
/// └── classifier.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The default data set compiled into the crate.
    pub fn bundled() -> LoadResult<Content> {
        Ok(Content {
            config: ConfigLoader::parse(BUNDLED_CONFIG)?,
            skills: SkillCatalogLoader::parse(BUNDLED_SKILLS)?,
            classifier: ClassifierLoader::parse(BUNDLED_CLASSIFIER)?,
        })
    }

    /// Load balance configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<SkillRegistry> {
        SkillCatalogLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load boss/elite lists from `classifier.ron`.
    pub fn load_classifier(&self) -> LoadResult<EntityClassifier> {
        ClassifierLoader::load(&self.data_dir.join("classifier.ron"))
    }

    /// Load every file of the data directory.
    pub fn load(&self) -> LoadResult<Content> {
        Ok(Content {
            config: self.load_config()?,
            skills: self.load_skills()?,
            classifier: self.load_classifier()?,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
