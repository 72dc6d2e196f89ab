//! Balance configuration loader.

use std::path::Path;

use monarch_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`GameConfig`] from TOML files.
///
/// Missing tables and keys fall back to their defaults, so a file only needs
/// to list what it overrides.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse and validate config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        config
            .progression
            .experience_curve
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid experience curve: {}", e))?;

        let mitigation = config.minions.damage_mitigation;
        if !(0.0..1.0).contains(&mitigation) {
            anyhow::bail!("minions.damage_mitigation must be in [0, 1), got {}", mitigation);
        }
        if config.minions.follow_stop_distance > config.minions.follow_start_distance {
            anyhow::bail!("minions.follow_stop_distance must not exceed follow_start_distance");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = ConfigLoader::parse("").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = ConfigLoader::parse(
            r#"
            [minions]
            owner_absent_timeout = 1200

            [rewards]
            kill_max = 750.0
            "#,
        )
        .unwrap();
        assert_eq!(config.minions.owner_absent_timeout, 1200);
        assert_eq!(config.minions.think_interval, 10);
        assert_eq!(config.rewards.kill_max, 750.0);
        assert_eq!(config.progression.base_stat, 10);
    }

    #[test]
    fn rejects_full_mitigation() {
        let err = ConfigLoader::parse("[minions]\ndamage_mitigation = 1.0\n").unwrap_err();
        assert!(err.to_string().contains("damage_mitigation"));
    }

    #[test]
    fn rejects_flat_curve() {
        let text = r#"
            [progression.experience_curve]
            base = 500

            [[progression.experience_curve.segments]]
            shape = { Linear = { per_level = 0.0 } }
        "#;
        assert!(ConfigLoader::parse(text).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ConfigLoader::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
