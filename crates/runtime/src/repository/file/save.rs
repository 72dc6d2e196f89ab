//! File-based PlayerRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use monarch_core::PlayerId;

use crate::repository::{PlayerRepository, RepositoryError, Result, SaveData};

/// Stores one pretty-printed JSON document per player.
///
/// Saves are written to `player_{id}.json.tmp` and renamed over the real
/// file, so a crash mid-write leaves the previous save intact.
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    /// Create a repository rooted at `base_dir`, creating the directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn save_path(&self, player: PlayerId) -> PathBuf {
        self.base_dir.join(format!("player_{}.json", player.0))
    }

    /// Reads a save document from an arbitrary path.
    pub fn read_path(path: impl AsRef<Path>) -> Result<SaveData> {
        let bytes = fs::read(path.as_ref())?;
        serde_json::from_slice(&bytes).map_err(|e| RepositoryError::CorruptedSave(e.to_string()))
    }
}

impl PlayerRepository for FileSaveRepository {
    fn save(&self, player: PlayerId, data: &SaveData) -> Result<()> {
        let path = self.save_path(player);
        let temp_path = path.with_extension("json.tmp");

        let bytes =
            serde_json::to_vec_pretty(data).map_err(|e| RepositoryError::Encode(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(target: "runtime::repository", "Saved {} to {}", player, path.display());
        Ok(())
    }

    fn load(&self, player: PlayerId) -> Result<Option<SaveData>> {
        let path = self.save_path(player);
        if !path.exists() {
            return Ok(None);
        }

        let data = Self::read_path(&path)?;
        tracing::debug!(target: "runtime::repository", "Loaded {} from {}", player, path.display());
        Ok(Some(data))
    }

    fn exists(&self, player: PlayerId) -> bool {
        self.save_path(player).exists()
    }

    fn delete(&self, player: PlayerId) -> Result<()> {
        let path = self.save_path(player);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(target: "runtime::repository", "Deleted save of {}", player);
        }
        Ok(())
    }

    fn list_players(&self) -> Result<Vec<PlayerId>> {
        let mut players = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename
                    .strip_prefix("player_")
                    .and_then(|s| s.strip_suffix(".json"))
                && let Ok(id) = id.parse::<u64>()
            {
                players.push(PlayerId(id));
            }
        }
        players.sort_unstable();
        Ok(players)
    }
}

#[cfg(test)]
mod tests {
    use monarch_core::{GameConfig, ProgressionRecord, SkillBook, Tick};

    use super::*;
    use crate::storage::ItemStorage;

    fn sample(level: u32) -> SaveData {
        let config = GameConfig::default();
        let mut record = ProgressionRecord::new(&config.progression);
        record.set_level(&config.progression, level);
        record.post_message("saved", Tick(3));
        SaveData::capture(&record, &SkillBook::new(), &ItemStorage::new())
    }

    #[test]
    fn save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path().join("players")).unwrap();
        let player = PlayerId(42);

        assert!(repo.load(player).unwrap().is_none());
        let data = sample(7);
        repo.save(player, &data).unwrap();
        assert!(repo.exists(player));
        assert_eq!(repo.load(player).unwrap(), Some(data));
        assert!(!repo.base_dir().join("player_42.json.tmp").exists());

        repo.delete(player).unwrap();
        assert!(!repo.exists(player));
    }

    #[test]
    fn later_save_replaces_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        repo.save(PlayerId(1), &sample(2)).unwrap();
        repo.save(PlayerId(1), &sample(9)).unwrap();
        assert_eq!(repo.load(PlayerId(1)).unwrap().unwrap().level, 9);
    }

    #[test]
    fn lists_only_save_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        repo.save(PlayerId(9), &sample(1)).unwrap();
        repo.save(PlayerId(3), &sample(1)).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        assert_eq!(repo.list_players().unwrap(), vec![PlayerId(3), PlayerId(9)]);
    }

    #[test]
    fn corrupted_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("player_5.json"), "{ not json").unwrap();
        assert!(matches!(
            repo.load(PlayerId(5)),
            Err(RepositoryError::CorruptedSave(_))
        ));
    }
}
