//! Tinker Engine - configuration, asset loading and storage for the Tinker
//! crafting game.
//!
//! This crate provides the outer layer around the crafting session:
//! TOML engine configuration, the JSON catalog loader, the JSON file store
//! and the `Game` bootstrap that ties them together.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog_loader;
pub mod config;
pub mod file_store;
pub mod game;

pub use catalog_loader::{
    CatalogLoadError, CatalogLoadResult, CatalogLoader, CatalogLoaderStats, DEFAULT_CATALOG_PATH,
};
pub use config::{EngineConfig, CONFIG_FILE};
pub use file_store::JsonFileStore;
pub use game::Game;
