//! Game bootstrap.
//!
//! Wires the engine config, the catalog files and the file store into a
//! crafting session.

use std::sync::Arc;

use tracing::info;

use tinker_common::{CraftResult, TinkerError, TinkerResult};
use tinker_gameplay::{Catalog, Command, CraftingSession};

use crate::catalog_loader::{CatalogLoadError, CatalogLoader};
use crate::config::EngineConfig;
use crate::file_store::JsonFileStore;

impl From<CatalogLoadError> for TinkerError {
    fn from(e: CatalogLoadError) -> Self {
        Self::Catalog(e.to_string())
    }
}

/// A running game: config plus the player's crafting session.
#[derive(Debug)]
pub struct Game {
    config: EngineConfig,
    session: CraftingSession<JsonFileStore>,
}

impl Game {
    /// Loads the catalog from `config.data_dir` and restores saved state
    /// from `config.save_dir`.
    pub fn load(config: EngineConfig) -> TinkerResult<Self> {
        let catalog = CatalogLoader::new(&config.data_dir).load()?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Starts a game over an already loaded catalog.
    #[must_use]
    pub fn with_catalog(mut config: EngineConfig, catalog: Catalog) -> Self {
        config.validate();
        let store = JsonFileStore::new(&config.save_dir);
        let session = CraftingSession::new(Arc::new(catalog), config.session_config(), store);
        info!("Game started, saving to {}", config.save_dir.display());
        Self { config, session }
    }

    /// Applies one player command.
    pub fn apply(&mut self, command: Command) -> CraftResult<()> {
        self.session.apply(command)
    }

    /// Returns the engine config.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the crafting session.
    #[must_use]
    pub const fn session(&self) -> &CraftingSession<JsonFileStore> {
        &self.session
    }

    /// Returns the crafting session mutably.
    pub fn session_mut(&mut self) -> &mut CraftingSession<JsonFileStore> {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use tinker_common::{ItemId, Slot};
    use tinker_gameplay::SlotRef;

    fn catalog_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/catalog")
    }

    fn config(temp_dir: &TempDir) -> EngineConfig {
        EngineConfig {
            data_dir: catalog_dir(),
            save_dir: temp_dir.path().join("saves"),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_shipped_catalog_loads_strictly() {
        let mut loader = CatalogLoader::new(catalog_dir()).with_strict(true);
        let catalog = loader.load().expect("shipped catalog is valid");
        assert!(catalog.find_by_id("final-item").is_some());
        assert_eq!(loader.stats().oversized_patterns, 0);
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = EngineConfig {
            data_dir: temp_dir.path().join("nowhere"),
            ..EngineConfig::default()
        };
        assert!(matches!(Game::load(config), Err(TinkerError::Catalog(_))));
    }

    #[test]
    fn test_craft_and_resume() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let mut game = Game::load(config(&temp_dir)).expect("load");
        let first = game.session().catalog().recipes()[0].clone();
        // Stock exactly the ingredients, then place them where the pattern says.
        for (row, cells) in first.pattern.rows().iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let Some(id) = cell else { continue };
                game.apply(Command::AddResource(id.clone())).expect("resource");
                let from = game
                    .session()
                    .inventory()
                    .slots()
                    .iter()
                    .position(|s| s.holds(id))
                    .expect("just added");
                game.apply(Command::Move {
                    from: SlotRef::Inventory(from),
                    to: SlotRef::Grid(row * 3 + col),
                })
                .expect("move");
            }
        }
        game.apply(Command::Confirm).expect("confirm");
        assert!(fs::metadata(temp_dir.path().join("saves/inventory.json")).is_ok());

        let resumed = Game::load(config(&temp_dir)).expect("reload");
        let result = &first.result.id;
        assert!(resumed.session().discovered().contains(result));
        assert_eq!(resumed.session().inventory().count_of(result), 1);
        assert_eq!(
            resumed.session().inventory().get(0),
            Some(&Slot::Occupied(ItemId::new(result.as_str())))
        );
    }
}
