//! Repository traits for persisted player data.

use monarch_core::PlayerId;

use super::Result;
use super::types::SaveData;

/// Keyed store of per-player save data.
///
/// Implementations must be usable from the simulation worker thread and
/// from tooling at the same time, hence `Send + Sync` and `&self` methods.
pub trait PlayerRepository: Send + Sync {
    /// Persist `data` for `player`, replacing any previous save.
    fn save(&self, player: PlayerId, data: &SaveData) -> Result<()>;

    /// Load the save for `player`, or `None` for a first join.
    fn load(&self, player: PlayerId) -> Result<Option<SaveData>>;

    fn exists(&self, player: PlayerId) -> bool;

    fn delete(&self, player: PlayerId) -> Result<()>;

    /// Every player with a save, in ascending id order.
    fn list_players(&self) -> Result<Vec<PlayerId>> {
        Ok(Vec::new())
    }
}
