//! Persisted state documents and the storage seam.
//!
//! Two independent documents are persisted: the inventory contents and the
//! discovered set. The session talks to storage only through [`GameStore`],
//! so the crafting core runs the same against memory, files, or anything
//! else that can hold two JSON strings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use tinker_common::{ItemId, SchemaVersion, StoreError, StoreResult};

/// Storage key of the inventory document.
pub const INVENTORY_KEY: &str = "inventory";

/// Storage key of the discovered document.
pub const DISCOVERED_KEY: &str = "discovered";

/// Persisted inventory: slot contents in index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDocument {
    /// Format version
    #[serde(default)]
    pub version: SchemaVersion,
    /// Item id per slot, `null` for empty
    pub slots: Vec<Option<ItemId>>,
}

/// Persisted discovered set, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredDocument {
    /// Format version
    #[serde(default)]
    pub version: SchemaVersion,
    /// Discovered item ids
    pub items: Vec<ItemId>,
}

/// Older saves stored whole item records (or bare ids) per slot.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacySlot {
    Id(ItemId),
    Record { id: ItemId },
}

impl From<LegacySlot> for ItemId {
    fn from(value: LegacySlot) -> Self {
        match value {
            LegacySlot::Id(id) | LegacySlot::Record { id } => id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InventoryWire {
    Current(InventoryDocument),
    Legacy(Vec<Option<LegacySlot>>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DiscoveredWire {
    Current(DiscoveredDocument),
    Legacy(Vec<ItemId>),
}

fn check_version(found: SchemaVersion) -> StoreResult<()> {
    if SchemaVersion::DOCUMENT.can_read(&found) {
        Ok(())
    } else {
        Err(StoreError::VersionMismatch {
            expected: SchemaVersion::DOCUMENT.to_string(),
            found: found.to_string(),
        })
    }
}

fn serialization(e: &serde_json::Error) -> StoreError {
    StoreError::Serialization(e.to_string())
}

impl InventoryDocument {
    /// Creates a document at the current version.
    #[must_use]
    pub fn new(slots: Vec<Option<ItemId>>) -> Self {
        Self {
            version: SchemaVersion::DOCUMENT,
            slots,
        }
    }

    /// Parses a document, accepting the legacy bare-array shape.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        match serde_json::from_str(json).map_err(|e| serialization(&e))? {
            InventoryWire::Current(doc) => {
                check_version(doc.version)?;
                Ok(doc)
            },
            InventoryWire::Legacy(slots) => Ok(Self::new(
                slots.into_iter().map(|s| s.map(ItemId::from)).collect(),
            )),
        }
    }

    /// Serializes to JSON.
    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string(self).map_err(|e| serialization(&e))
    }
}

impl DiscoveredDocument {
    /// Creates a document at the current version.
    #[must_use]
    pub fn new(items: Vec<ItemId>) -> Self {
        Self {
            version: SchemaVersion::DOCUMENT,
            items,
        }
    }

    /// Parses a document, accepting the legacy bare-array shape.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        match serde_json::from_str(json).map_err(|e| serialization(&e))? {
            DiscoveredWire::Current(doc) => {
                check_version(doc.version)?;
                Ok(doc)
            },
            DiscoveredWire::Legacy(items) => Ok(Self::new(items)),
        }
    }

    /// Serializes to JSON.
    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string(self).map_err(|e| serialization(&e))
    }
}

/// Load/save access to the two persisted documents.
///
/// `Ok(None)` from a load means "nothing saved yet".
pub trait GameStore {
    /// Loads the inventory document.
    fn load_inventory(&self) -> StoreResult<Option<InventoryDocument>>;

    /// Saves the inventory document.
    fn save_inventory(&mut self, doc: &InventoryDocument) -> StoreResult<()>;

    /// Loads the discovered document.
    fn load_discovered(&self) -> StoreResult<Option<DiscoveredDocument>>;

    /// Saves the discovered document.
    fn save_discovered(&mut self, doc: &DiscoveredDocument) -> StoreResult<()>;

    /// Removes all persisted state.
    fn clear(&mut self) -> StoreResult<()>;
}

impl<S: GameStore + ?Sized> GameStore for Box<S> {
    fn load_inventory(&self) -> StoreResult<Option<InventoryDocument>> {
        (**self).load_inventory()
    }

    fn save_inventory(&mut self, doc: &InventoryDocument) -> StoreResult<()> {
        (**self).save_inventory(doc)
    }

    fn load_discovered(&self) -> StoreResult<Option<DiscoveredDocument>> {
        (**self).load_discovered()
    }

    fn save_discovered(&mut self, doc: &DiscoveredDocument) -> StoreResult<()> {
        (**self).save_discovered(doc)
    }

    fn clear(&mut self) -> StoreResult<()> {
        (**self).clear()
    }
}

/// Key-value store kept in memory, holding documents as JSON strings.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Raw documents by key
    entries: HashMap<String, String>,
    /// Number of successful saves
    writes: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON stored under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores raw JSON under `key`, bypassing validation.
    pub fn set_raw(&mut self, key: &str, json: impl Into<String>) {
        self.entries.insert(key.to_string(), json.into());
    }

    /// Number of successful saves so far.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// Checks if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn put(&mut self, key: &str, json: String) {
        self.entries.insert(key.to_string(), json);
        self.writes += 1;
    }
}

impl GameStore for MemoryStore {
    fn load_inventory(&self) -> StoreResult<Option<InventoryDocument>> {
        self.raw(INVENTORY_KEY)
            .map(InventoryDocument::from_json)
            .transpose()
    }

    fn save_inventory(&mut self, doc: &InventoryDocument) -> StoreResult<()> {
        let json = doc.to_json()?;
        self.put(INVENTORY_KEY, json);
        Ok(())
    }

    fn load_discovered(&self) -> StoreResult<Option<DiscoveredDocument>> {
        self.raw(DISCOVERED_KEY)
            .map(DiscoveredDocument::from_json)
            .transpose()
    }

    fn save_discovered(&mut self, doc: &DiscoveredDocument) -> StoreResult<()> {
        let json = doc.to_json()?;
        self.put(DISCOVERED_KEY, json);
        Ok(())
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_inventory_document() {
        let doc = InventoryDocument::new(vec![Some(ItemId::new("wood")), None]);
        let json = doc.to_json().expect("serialize");
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert_eq!(InventoryDocument::from_json(&json).expect("parse"), doc);
    }

    #[test]
    fn test_legacy_inventory_with_item_records() {
        let json = r#"[{"id":"wood","name":"Wood","image":"wood.png"}, null, "stone"]"#;
        let doc = InventoryDocument::from_json(json).expect("parse legacy");
        assert_eq!(
            doc.slots,
            vec![Some(ItemId::new("wood")), None, Some(ItemId::new("stone"))]
        );
    }

    #[test]
    fn test_legacy_discovered_array() {
        let doc = DiscoveredDocument::from_json(r#"["plank","torch"]"#).expect("parse");
        assert_eq!(doc.items.len(), 2);
    }

    #[test]
    fn test_incompatible_version_rejected() {
        let json = r#"{"version":"2.0.0","items":[]}"#;
        assert!(matches!(
            DiscoveredDocument::from_json(json),
            Err(StoreError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_corrupt_json_rejected() {
        assert!(matches!(
            InventoryDocument::from_json("{not json"),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.load_inventory().expect("load").is_none());

        let doc = DiscoveredDocument::new(vec![ItemId::new("plank")]);
        store.save_discovered(&doc).expect("save");
        assert_eq!(store.load_discovered().expect("load"), Some(doc));
        assert_eq!(store.writes(), 1);

        store.clear().expect("clear");
        assert!(store.is_empty());
    }
}
