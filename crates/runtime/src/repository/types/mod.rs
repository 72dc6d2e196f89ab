//! Shared types for repository layer.

mod save_data;

pub use save_data::SaveData;
