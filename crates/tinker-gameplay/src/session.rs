//! Crafting session.
//!
//! The session owns the player's inventory, the 3x3 crafting grid, the
//! discovered set and the win flag. Every grid mutation re-runs the matcher
//! before returning, so the pending result always reflects the fully
//! applied grid. Persistence happens after state settles; a failing store
//! is logged and never turns a successful move into an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tinker_common::{CraftError, CraftResult, ItemId, RecipeId, Slot, StoreError};
use tinker_kernel::{find_first_match, CraftingGrid, GridOffset, GRID_SLOTS};

use crate::catalog::{Catalog, Item, Recipe};
use crate::discovery::{self, DiscoveredSet};
use crate::events::{CraftEvent, EventBus, DEFAULT_EVENT_CAPACITY};
use crate::inventory::{Inventory, OverflowPolicy, DEFAULT_CAPACITY};
use crate::store::{DiscoveredDocument, GameStore, InventoryDocument};

/// Item id that wins the game unless configured otherwise.
pub const DEFAULT_FINAL_ITEM: &str = "final-item";

/// Session parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Inventory slots after a reset
    pub inventory_capacity: usize,
    /// What happens when the inventory is full
    pub overflow_policy: OverflowPolicy,
    /// Crafting this item wins the game
    pub final_item_id: ItemId,
    /// Event bus capacity
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inventory_capacity: DEFAULT_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            final_item_id: ItemId::new(DEFAULT_FINAL_ITEM),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// A slot address in either container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotRef {
    /// Inventory slot index
    Inventory(usize),
    /// Grid cell index (row-major)
    Grid(usize),
}

/// External input, one per user gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Drag an item from one slot to another
    Move {
        /// Where the item is
        from: SlotRef,
        /// Where it is dropped
        to: SlotRef,
    },
    /// Click a grid cell to send its item back
    ClearCell(usize),
    /// Commit the pending craft
    Confirm,
    /// Start over
    Reset,
    /// Take one unit of a base resource
    AddResource(ItemId),
}

/// A matched recipe awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCraft {
    /// Matched recipe
    pub recipe_id: RecipeId,
    /// Item the craft produces
    pub result: Item,
    /// Where the recipe sits on the grid
    pub offset: GridOffset,
}

/// Crafting state machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CraftState {
    /// No recipe on the grid
    #[default]
    Empty,
    /// A recipe matches and can be confirmed
    Pending(PendingCraft),
}

impl CraftState {
    /// The pending craft, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingCraft> {
        match self {
            Self::Empty => None,
            Self::Pending(pending) => Some(pending),
        }
    }

    /// Check if a craft can be confirmed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// What a committed craft did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftOutcome {
    /// Recipe used
    pub recipe_id: RecipeId,
    /// Item produced
    pub item: Item,
    /// Inventory slot the item landed in
    pub inventory_index: usize,
    /// First time this item was crafted
    pub newly_discovered: bool,
    /// The item was the final item
    pub won: bool,
}

/// A single player's crafting session.
#[derive(Debug)]
pub struct CraftingSession<S> {
    catalog: Arc<Catalog>,
    config: SessionConfig,
    inventory: Inventory,
    grid: CraftingGrid,
    state: CraftState,
    discovered: DiscoveredSet,
    won: bool,
    store: S,
    events: EventBus,
}

impl<S: GameStore> CraftingSession<S> {
    /// Creates a session, restoring inventory and discoveries from `store`.
    ///
    /// Missing or unreadable documents start from their empty defaults.
    /// Documents written by an incompatible version are left untouched in
    /// the store until the session next changes that state.
    pub fn new(catalog: Arc<Catalog>, config: SessionConfig, store: S) -> Self {
        let capacity = config.inventory_capacity;
        let policy = config.overflow_policy;

        let (inventory, inventory_locked) = match store.load_inventory() {
            Ok(Some(doc)) => {
                let inventory = Inventory::restore(doc.slots, capacity, policy, |id| {
                    catalog.find_by_id(id.as_str()).is_some()
                });
                (inventory, false)
            },
            Ok(None) => (Inventory::new(capacity, policy), false),
            Err(e) => {
                warn!("Failed to load inventory, starting empty: {e}");
                (Inventory::new(capacity, policy), is_version_mismatch(&e))
            },
        };

        let (discovered, discovered_locked) = match store.load_discovered() {
            Ok(Some(doc)) => (DiscoveredSet::from_ids(doc.items), false),
            Ok(None) => (DiscoveredSet::new(), false),
            Err(e) => {
                warn!("Failed to load discovered recipes, starting empty: {e}");
                (DiscoveredSet::new(), is_version_mismatch(&e))
            },
        };

        let events = EventBus::new(config.event_capacity);
        let mut session = Self {
            catalog,
            config,
            inventory,
            grid: CraftingGrid::new(),
            state: CraftState::Empty,
            discovered,
            won: false,
            store,
            events,
        };

        if !inventory_locked {
            session.persist_inventory();
        }
        if !discovered_locked {
            session.persist_discovered();
        }

        info!(
            "Crafting session ready: {}/{} slots used, {} discovered",
            session.inventory.occupied(),
            session.inventory.len(),
            session.discovered.len()
        );
        session
    }

    // === Moves ===

    /// Places `item` from `source` onto grid cell `grid_index`.
    ///
    /// An occupied target is evicted back to the inventory before the new
    /// item goes in. A grid source is a swap.
    pub fn place_item(&mut self, grid_index: usize, item: &ItemId, source: SlotRef) -> CraftResult<()> {
        if self.catalog.find_by_id(item.as_str()).is_none() {
            debug!("Ignoring placement of unknown item '{item}'");
            return Err(CraftError::NotFound(item.clone()));
        }

        match source {
            SlotRef::Grid(from) => {
                if !self.grid.slot(from).is_some_and(|s| s.holds(item)) {
                    return Err(CraftError::invalid_move(format!(
                        "grid cell {from} does not hold '{item}'"
                    )));
                }
                self.swap_within_grid(from, grid_index)
            },
            SlotRef::Inventory(from) => {
                check_grid_index(grid_index)?;
                if !self.inventory.get(from).is_some_and(|s| s.holds(item)) {
                    return Err(CraftError::invalid_move(format!(
                        "inventory slot {from} does not hold '{item}'"
                    )));
                }

                let placed = match self.grid.take(grid_index) {
                    Some(occupant) if self.inventory.has_room() => {
                        self.inventory.add(occupant)?;
                        self.inventory.remove_at(from)?
                    },
                    // Bounded and full: the occupant takes the vacated slot.
                    Some(occupant) => self.inventory.replace(from, occupant)?,
                    None => self.inventory.remove_at(from)?,
                };
                self.grid.set(grid_index, Slot::Occupied(placed));

                self.refresh_result();
                self.persist_inventory();
                Ok(())
            },
        }
    }

    /// Exchanges two grid cells.
    pub fn swap_within_grid(&mut self, from: usize, to: usize) -> CraftResult<()> {
        check_grid_index(from)?;
        check_grid_index(to)?;
        if from == to {
            return Ok(());
        }

        self.grid.swap(from, to);
        self.refresh_result();
        Ok(())
    }

    /// Sends a grid cell's item back to the inventory. Empty cells are ignored.
    ///
    /// Returns the inventory slot the item landed in.
    pub fn clear_cell(&mut self, grid_index: usize) -> CraftResult<Option<usize>> {
        check_grid_index(grid_index)?;
        if self.grid.slot(grid_index).is_some_and(Slot::is_empty) {
            return Ok(None);
        }
        self.return_cell(grid_index).map(Some)
    }

    /// Moves a grid cell's item back to the inventory.
    ///
    /// Unlike [`clear_cell`](Self::clear_cell), an empty cell is an invalid move.
    pub fn return_to_inventory(&mut self, grid_index: usize) -> CraftResult<usize> {
        check_grid_index(grid_index)?;
        self.return_cell(grid_index)
    }

    /// Adds one unit of a base resource to the inventory.
    pub fn add_resource(&mut self, id: &ItemId) -> CraftResult<usize> {
        if !self.catalog.is_resource(id.as_str()) {
            return Err(CraftError::NotFound(id.clone()));
        }
        let index = self.inventory.add(id.clone())?;
        self.persist_inventory();
        Ok(index)
    }

    // === Crafting ===

    /// Commits the pending craft.
    ///
    /// The grid contents are consumed, the result goes to the inventory and
    /// is recorded as discovered.
    pub fn confirm_craft(&mut self) -> CraftResult<CraftOutcome> {
        let Some(pending) = self.state.pending().cloned() else {
            return Err(CraftError::InvalidConfirm);
        };
        if !self.inventory.has_room() {
            return Err(CraftError::InventoryFull {
                capacity: self.inventory.capacity(),
            });
        }

        let item_id = pending.result.id.clone();
        let inventory_index = self.inventory.add(item_id.clone())?;
        self.grid.clear();
        self.refresh_result();

        self.events.publish(CraftEvent::ItemCrafted {
            recipe_id: pending.recipe_id.clone(),
            item_id: item_id.clone(),
        });

        let newly_discovered = self.discovered.insert(item_id.clone());
        if newly_discovered {
            info!("Discovered '{}'", pending.result.name);
            self.events.publish(CraftEvent::ItemDiscovered {
                item_id: item_id.clone(),
            });
            self.persist_discovered();
        }

        let won = item_id == self.config.final_item_id;
        if won && !self.won {
            self.won = true;
            info!("Final item '{item_id}' crafted");
            self.events.publish(CraftEvent::GameWon {
                item_id: item_id.clone(),
            });
        }

        self.persist_inventory();

        Ok(CraftOutcome {
            recipe_id: pending.recipe_id,
            item: pending.result,
            inventory_index,
            newly_discovered,
            won,
        })
    }

    /// Clears inventory, grid, discoveries, the win flag and persisted state.
    pub fn reset_all(&mut self) {
        self.inventory.reset();
        self.grid.clear();
        self.discovered.clear();
        self.won = false;
        self.refresh_result();

        if let Err(e) = self.store.clear() {
            warn!("Failed to clear saved state: {e}");
        }
        self.events.publish(CraftEvent::GameReset);
        info!("Game reset");
    }

    /// Applies one external command.
    pub fn apply(&mut self, command: Command) -> CraftResult<()> {
        match command {
            Command::Move { from, to } => self.move_item(from, to),
            Command::ClearCell(index) => self.clear_cell(index).map(|_| ()),
            Command::Confirm => self.confirm_craft().map(|_| ()),
            Command::Reset => {
                self.reset_all();
                Ok(())
            },
            Command::AddResource(id) => self.add_resource(&id).map(|_| ()),
        }
    }

    // === Queries ===

    /// The catalog this session crafts from.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Session parameters.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The inventory.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// The crafting grid.
    #[must_use]
    pub const fn grid(&self) -> &CraftingGrid {
        &self.grid
    }

    /// Current crafting state.
    #[must_use]
    pub const fn state(&self) -> &CraftState {
        &self.state
    }

    /// The pending craft, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingCraft> {
        self.state.pending()
    }

    /// Items crafted so far.
    #[must_use]
    pub const fn discovered(&self) -> &DiscoveredSet {
        &self.discovered
    }

    /// Discovered items resolved through the catalog.
    #[must_use]
    pub fn discovered_items(&self) -> Vec<&Item> {
        self.catalog.resolve_discovered(&self.discovered)
    }

    /// Undiscovered recipes the inventory could pay for right now.
    #[must_use]
    pub fn discoverable(&self) -> Vec<&Recipe> {
        discovery::discoverable(&self.catalog, &self.inventory, &self.discovered)
    }

    /// Whether the final item has been crafted since the last reset.
    #[must_use]
    pub const fn has_won(&self) -> bool {
        self.won
    }

    /// Event bus carrying session notifications.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the session, returning the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    // === Internals ===

    fn move_item(&mut self, from: SlotRef, to: SlotRef) -> CraftResult<()> {
        match (from, to) {
            (SlotRef::Inventory(index), SlotRef::Grid(cell)) => {
                let item = self
                    .inventory
                    .get(index)
                    .and_then(Slot::item)
                    .cloned()
                    .ok_or_else(|| {
                        CraftError::invalid_move(format!("inventory slot {index} is empty"))
                    })?;
                self.place_item(cell, &item, from)
            },
            (SlotRef::Grid(a), SlotRef::Grid(b)) => self.swap_within_grid(a, b),
            (SlotRef::Grid(cell), SlotRef::Inventory(_)) => {
                self.return_to_inventory(cell).map(|_| ())
            },
            (SlotRef::Inventory(_), SlotRef::Inventory(_)) => Err(CraftError::invalid_move(
                "inventory slots cannot be rearranged",
            )),
        }
    }

    fn return_cell(&mut self, grid_index: usize) -> CraftResult<usize> {
        if self.grid.slot(grid_index).is_some_and(Slot::is_empty) {
            return Err(CraftError::invalid_move(format!(
                "grid cell {grid_index} is empty"
            )));
        }
        if !self.inventory.has_room() {
            return Err(CraftError::InventoryFull {
                capacity: self.inventory.capacity(),
            });
        }

        let Some(item) = self.grid.take(grid_index) else {
            return Err(CraftError::invalid_move(format!(
                "grid cell {grid_index} out of range"
            )));
        };
        let index = self.inventory.add(item)?;

        self.refresh_result();
        self.persist_inventory();
        Ok(index)
    }

    fn refresh_result(&mut self) {
        let next = find_first_match(&self.grid, self.catalog.recipes()).map_or(
            CraftState::Empty,
            |found| {
                CraftState::Pending(PendingCraft {
                    recipe_id: found.recipe.id.clone(),
                    result: found.recipe.result.clone(),
                    offset: found.offset,
                })
            },
        );

        if next != self.state {
            let result = next.pending().map(|p| p.result.id.clone());
            debug!("Craft result changed: {result:?}");
            self.events.publish(CraftEvent::ResultChanged { result });
            self.state = next;
        }
    }

    fn persist_inventory(&mut self) {
        let doc = InventoryDocument::new(self.inventory.contents());
        if let Err(e) = self.store.save_inventory(&doc) {
            warn!("Failed to save inventory: {e}");
        }
    }

    fn persist_discovered(&mut self) {
        let doc = DiscoveredDocument::new(self.discovered.to_ids());
        if let Err(e) = self.store.save_discovered(&doc) {
            warn!("Failed to save discovered recipes: {e}");
        }
    }
}

const fn is_version_mismatch(e: &StoreError) -> bool {
    matches!(e, StoreError::VersionMismatch { .. })
}

fn check_grid_index(index: usize) -> CraftResult<()> {
    if index < GRID_SLOTS {
        Ok(())
    } else {
        Err(CraftError::invalid_move(format!(
            "grid cell {index} out of range"
        )))
    }
}
