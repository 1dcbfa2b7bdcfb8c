//! Recipe discovery tracking.
//!
//! This module provides:
//! - The set of items the player has crafted at least once
//! - The "discoverable now" view: undiscovered recipes whose ingredients
//!   the inventory holds in sufficient quantity, regardless of arrangement

use ahash::AHashMap;
use std::collections::HashSet;

use tinker_common::ItemId;
use tinker_kernel::ShapedPattern;

use crate::catalog::{Catalog, Recipe};
use crate::inventory::Inventory;

/// Items crafted at least once, in first-discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredSet {
    /// Discovery order
    order: Vec<ItemId>,
    /// Membership index
    members: HashSet<ItemId>,
}

impl DiscoveredSet {
    /// Create new empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a persisted id list, dropping duplicates.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = ItemId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Record a discovery. Returns false if it was already known.
    pub fn insert(&mut self, id: ItemId) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.insert(id.clone());
        self.order.push(id);
        true
    }

    /// Check if an item has been discovered.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.members.contains(id)
    }

    /// Number of discoveries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if nothing has been discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.order.iter()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Ids in document form.
    #[must_use]
    pub fn to_ids(&self) -> Vec<ItemId> {
        self.order.clone()
    }
}

/// Units of each ingredient a pattern needs, ignoring arrangement.
#[must_use]
pub fn required_counts(pattern: &ShapedPattern) -> AHashMap<&ItemId, usize> {
    let mut required = AHashMap::new();
    for id in pattern.ingredients() {
        *required.entry(id).or_insert(0) += 1;
    }
    required
}

/// Check if the inventory holds enough of every ingredient of a recipe.
#[must_use]
pub fn has_enough_resources(recipe: &Recipe, inventory: &Inventory) -> bool {
    required_counts(&recipe.pattern)
        .into_iter()
        .all(|(id, needed)| inventory.count_of(id) >= needed)
}

/// Undiscovered recipes the player could craft with what they hold now.
///
/// This is an aggregate quantity check, not a shape check: it answers
/// "could this be crafted if arranged correctly".
#[must_use]
pub fn discoverable<'a>(
    catalog: &'a Catalog,
    inventory: &Inventory,
    discovered: &DiscoveredSet,
) -> Vec<&'a Recipe> {
    catalog
        .recipes()
        .iter()
        .filter(|recipe| !discovered.contains(&recipe.result.id))
        .filter(|recipe| has_enough_resources(recipe, inventory))
        .collect()
}
