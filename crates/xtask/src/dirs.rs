//! Platform-specific directory utilities
//!
//! Resolves the same save directory the runtime uses, so tools and sessions
//! agree on where player files live.

use std::path::PathBuf;

/// Directory holding `player_<id>.json` files.
///
/// `MONARCH_SAVE_DIR` wins; otherwise the platform data directory:
/// - macOS: `~/Library/Application Support/shadow-monarch/players`
/// - Linux: `~/.local/share/shadow-monarch/players`
/// - Windows: `%APPDATA%\shadow-monarch\players`
/// - Fallback: `./save_data/players`
pub fn save_dir() -> PathBuf {
    std::env::var_os("MONARCH_SAVE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(monarch_runtime::runtime::default_save_dir)
}

/// Root data directory for the project (parent of [`save_dir`]).
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "shadow-monarch")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}
