//! JSON file store.
//!
//! Keeps each persisted document in its own file under a save directory.
//! Writes go to a temporary file first and are renamed into place.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use tinker_common::StoreResult;
use tinker_gameplay::{DiscoveredDocument, GameStore, InventoryDocument, DISCOVERED_KEY, INVENTORY_KEY};

/// File-backed [`GameStore`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Directory for document files
    save_dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store writing under `save_dir`.
    #[must_use]
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
        }
    }

    /// Gets the save directory path.
    #[must_use]
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Path of the document stored under `key`.
    #[must_use]
    pub fn document_path(&self, key: &str) -> PathBuf {
        self.save_dir.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.save_dir.join(format!("{key}.json.tmp"))
    }

    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, key: &str, json: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.save_dir)?;

        let temp_path = self.temp_path(key);
        let final_path = self.document_path(key);

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &final_path)?;
        debug!("Saved {}", final_path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.document_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl GameStore for JsonFileStore {
    fn load_inventory(&self) -> StoreResult<Option<InventoryDocument>> {
        self.read(INVENTORY_KEY)?
            .map(|json| InventoryDocument::from_json(&json))
            .transpose()
    }

    fn save_inventory(&mut self, doc: &InventoryDocument) -> StoreResult<()> {
        self.write(INVENTORY_KEY, &doc.to_json()?)
    }

    fn load_discovered(&self) -> StoreResult<Option<DiscoveredDocument>> {
        self.read(DISCOVERED_KEY)?
            .map(|json| DiscoveredDocument::from_json(&json))
            .transpose()
    }

    fn save_discovered(&mut self, doc: &DiscoveredDocument) -> StoreResult<()> {
        self.write(DISCOVERED_KEY, &doc.to_json()?)
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.remove(INVENTORY_KEY)?;
        self.remove(DISCOVERED_KEY)
    }
}
