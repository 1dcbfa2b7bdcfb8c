//! Slot contents shared by the inventory and the crafting grid.

use serde::{Deserialize, Serialize};
use std::mem;

use crate::ids::ItemId;

/// A single slot: either empty or holding exactly one item.
///
/// Serializes as `null` or the item identifier, which is the on-disk shape
/// of inventory documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<ItemId>", into = "Option<ItemId>")]
pub enum Slot {
    /// Nothing in the slot.
    #[default]
    Empty,
    /// One unit of an item.
    Occupied(ItemId),
}

impl Slot {
    /// Creates an occupied slot.
    #[must_use]
    pub fn occupied(id: impl Into<ItemId>) -> Self {
        Self::Occupied(id.into())
    }

    /// Check if the slot is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Get the item if not empty.
    #[must_use]
    pub const fn item(&self) -> Option<&ItemId> {
        match self {
            Self::Empty => None,
            Self::Occupied(id) => Some(id),
        }
    }

    /// Check if the slot holds the given item.
    #[must_use]
    pub fn holds(&self, id: &ItemId) -> bool {
        self.item() == Some(id)
    }

    /// Removes the item, leaving the slot empty.
    pub fn take(&mut self) -> Option<ItemId> {
        match mem::take(self) {
            Self::Empty => None,
            Self::Occupied(id) => Some(id),
        }
    }

    /// Puts an item in the slot, returning the previous occupant.
    pub fn replace(&mut self, id: ItemId) -> Option<ItemId> {
        match mem::replace(self, Self::Occupied(id)) {
            Self::Empty => None,
            Self::Occupied(prev) => Some(prev),
        }
    }
}

impl From<Option<ItemId>> for Slot {
    fn from(value: Option<ItemId>) -> Self {
        value.map_or(Self::Empty, Self::Occupied)
    }
}

impl From<Slot> for Option<ItemId> {
    fn from(value: Slot) -> Self {
        match value {
            Slot::Empty => None,
            Slot::Occupied(id) => Some(id),
        }
    }
}
