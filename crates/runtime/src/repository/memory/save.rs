//! In-memory PlayerRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use monarch_core::PlayerId;

use crate::repository::{PlayerRepository, RepositoryError, Result, SaveData};

/// Keeps saves in a map for the lifetime of the process.
#[derive(Default)]
pub struct InMemorySaveRepository {
    saves: RwLock<BTreeMap<PlayerId, SaveData>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a pre-existing save for `player`.
    pub fn with_save(player: PlayerId, data: SaveData) -> Self {
        let repo = Self::new();
        if let Ok(mut saves) = repo.saves.write() {
            saves.insert(player, data);
        }
        repo
    }
}

impl PlayerRepository for InMemorySaveRepository {
    fn save(&self, player: PlayerId, data: &SaveData) -> Result<()> {
        let mut saves = self
            .saves
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        saves.insert(player, data.clone());
        Ok(())
    }

    fn load(&self, player: PlayerId) -> Result<Option<SaveData>> {
        let saves = self
            .saves
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(saves.get(&player).cloned())
    }

    fn exists(&self, player: PlayerId) -> bool {
        self.saves
            .read()
            .map(|saves| saves.contains_key(&player))
            .unwrap_or(false)
    }

    fn delete(&self, player: PlayerId) -> Result<()> {
        let mut saves = self
            .saves
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        saves.remove(&player);
        Ok(())
    }

    fn list_players(&self) -> Result<Vec<PlayerId>> {
        let saves = self
            .saves
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(saves.keys().copied().collect())
    }
}
