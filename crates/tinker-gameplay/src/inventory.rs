//! Inventory system.
//!
//! A fixed-capacity, index-addressed list of single-item slots. What happens
//! when an item arrives and every slot is taken is an explicit
//! [`OverflowPolicy`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use tinker_common::{CraftError, CraftResult, ItemId, Slot};

/// Default number of inventory slots.
pub const DEFAULT_CAPACITY: usize = 20;

/// What `add` does when no slot is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Append a new slot (unbounded inventory).
    #[default]
    Grow,
    /// Refuse the item (bounded inventory).
    Reject,
}

/// An inventory container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    /// Slots, addressed by index
    slots: Vec<Slot>,
    /// Configured capacity
    capacity: usize,
    /// Overflow behaviour
    policy: OverflowPolicy,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, OverflowPolicy::default())
    }
}

impl Inventory {
    /// Creates an inventory of `capacity` empty slots.
    #[must_use]
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            slots: vec![Slot::Empty; capacity],
            capacity,
            policy,
        }
    }

    /// Restores an inventory from persisted slot contents.
    ///
    /// Contents shorter than `capacity` are discarded and the inventory starts
    /// empty. Ids rejected by `is_known` become empty slots.
    #[must_use]
    pub fn restore(
        contents: Vec<Option<ItemId>>,
        capacity: usize,
        policy: OverflowPolicy,
        is_known: impl Fn(&ItemId) -> bool,
    ) -> Self {
        if contents.len() < capacity {
            warn!(
                "Inventory document has {} slots, need at least {capacity}; reinitializing",
                contents.len()
            );
            return Self::new(capacity, policy);
        }

        let slots = contents
            .into_iter()
            .map(|entry| match entry {
                Some(id) if is_known(&id) => Slot::Occupied(id),
                Some(id) => {
                    warn!("Dropping unknown item '{id}' from saved inventory");
                    Slot::Empty
                },
                None => Slot::Empty,
            })
            .collect();

        Self {
            slots,
            capacity,
            policy,
        }
    }

    /// Returns the current number of slots (can exceed capacity under `Grow`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if there are no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the overflow policy.
    #[must_use]
    pub const fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Returns all slots.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Gets a slot by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Index of the first empty slot.
    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_empty)
    }

    /// Checks if `add` would succeed.
    #[must_use]
    pub fn has_room(&self) -> bool {
        self.policy == OverflowPolicy::Grow || self.first_empty().is_some()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// Number of slots holding `id`.
    #[must_use]
    pub fn count_of(&self, id: &ItemId) -> usize {
        self.slots.iter().filter(|s| s.holds(id)).count()
    }

    /// Iterates over held items.
    pub fn items(&self) -> impl Iterator<Item = &ItemId> {
        self.slots.iter().filter_map(Slot::item)
    }

    /// Places an item in the first empty slot and returns its index.
    pub fn add(&mut self, id: ItemId) -> CraftResult<usize> {
        if let Some(index) = self.first_empty() {
            self.slots[index] = Slot::Occupied(id);
            return Ok(index);
        }

        match self.policy {
            OverflowPolicy::Grow => {
                self.slots.push(Slot::Occupied(id));
                Ok(self.slots.len() - 1)
            },
            OverflowPolicy::Reject => Err(CraftError::InventoryFull {
                capacity: self.capacity,
            }),
        }
    }

    /// Empties the slot at `index` and returns what it held.
    pub fn remove_at(&mut self, index: usize) -> CraftResult<ItemId> {
        let slot = self.slot_mut(index)?;
        slot.take()
            .ok_or_else(|| CraftError::invalid_move(format!("inventory slot {index} is empty")))
    }

    /// Puts `id` into an occupied slot and returns the previous occupant.
    pub fn replace(&mut self, index: usize, id: ItemId) -> CraftResult<ItemId> {
        let Slot::Occupied(current) = self.slot_mut(index)? else {
            return Err(CraftError::invalid_move(format!(
                "inventory slot {index} is empty"
            )));
        };
        Ok(std::mem::replace(current, id))
    }

    /// Clears the inventory back to `capacity` empty slots.
    pub fn reset(&mut self) {
        self.slots = vec![Slot::Empty; self.capacity];
    }

    /// Slot contents in document form.
    #[must_use]
    pub fn contents(&self) -> Vec<Option<ItemId>> {
        self.slots.iter().map(|s| s.item().cloned()).collect()
    }

    fn slot_mut(&mut self, index: usize) -> CraftResult<&mut Slot> {
        let len = self.slots.len();
        self.slots.get_mut(index).ok_or_else(|| {
            CraftError::invalid_move(format!("inventory slot {index} out of range (len {len})"))
        })
    }
}
