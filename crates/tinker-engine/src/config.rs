//! Engine configuration.
//!
//! Provides the inventory, crafting and storage parameters of a game.
//! Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use tinker_common::ItemId;

use crate::catalog_loader::DEFAULT_CATALOG_PATH;
use tinker_gameplay::{
    OverflowPolicy, SessionConfig, DEFAULT_CAPACITY, DEFAULT_EVENT_CAPACITY, DEFAULT_FINAL_ITEM,
};

/// Configuration file name.
pub const CONFIG_FILE: &str = "tinker.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Inventory Settings ===
    /// Number of inventory slots after a reset
    pub inventory_capacity: usize,
    /// Behaviour when the inventory is full ("grow" or "reject")
    pub overflow_policy: OverflowPolicy,

    // === Crafting Settings ===
    /// Item id whose craft wins the game
    pub final_item_id: String,
    /// Capacity of the crafting event bus
    pub event_capacity: usize,

    // === Paths ===
    /// Directory holding resources.json and recipes.json
    pub data_dir: PathBuf,
    /// Directory for saved inventory and discoveries
    pub save_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Inventory
            inventory_capacity: DEFAULT_CAPACITY,
            overflow_policy: OverflowPolicy::Grow,

            // Crafting
            final_item_id: DEFAULT_FINAL_ITEM.to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,

            // Paths
            data_dir: PathBuf::from(DEFAULT_CATALOG_PATH),
            save_dir: PathBuf::from("saves"),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the working directory.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.inventory_capacity = self.inventory_capacity.clamp(1, 1024);
        self.event_capacity = self.event_capacity.clamp(1, 65_536);

        if self.final_item_id.trim().is_empty() {
            warn!("Empty final_item_id, falling back to '{DEFAULT_FINAL_ITEM}'");
            self.final_item_id = DEFAULT_FINAL_ITEM.to_string();
        }
    }

    /// Session parameters derived from this config.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            inventory_capacity: self.inventory_capacity,
            overflow_policy: self.overflow_policy,
            final_item_id: ItemId::new(self.final_item_id.as_str()),
            event_capacity: self.event_capacity,
        }
    }
}
