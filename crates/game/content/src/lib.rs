//! Data-driven content for the Shadow Monarch system.
//!
//! This crate provides loaders for the RON/TOML data files:
//! - Balance configuration (TOML)
//! - The skill catalog (RON)
//! - Boss/elite entity classification (RON)
//!
//! A default data set is compiled in and available through
//! [`ContentFactory::bundled`].
//!
//! All loaders use monarch-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ClassifierLoader, ConfigLoader, Content, ContentFactory, LoadResult, SkillCatalog,
    SkillCatalogLoader,
};
