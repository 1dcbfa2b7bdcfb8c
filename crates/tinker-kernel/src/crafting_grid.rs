//! Crafting Grid Computation
//!
//! This module provides the crafting grid and the shaped-recipe matcher:
//!
//! - A fixed 3x3 grid of [`Slot`]s, addressed row-major (`row * 3 + col`)
//! - Shaped patterns of at most 3x3 cells, with explicit empty cells
//! - First-match-wins lookup over an ordered recipe list
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐     ┌────────────────┐     ┌──────────────────┐
//! │ CraftingGrid  │────▶│ ShapedPattern  │────▶│ find_first_match │
//! │ (player input)│     │ (recipe shape) │     │ (catalog order)  │
//! └───────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! A pattern matches when it appears as a contiguous block of the grid at
//! some offset and every cell inside the pattern's footprint is equal,
//! including cells the pattern declares empty. Grid cells outside the
//! footprint are not constrained.
//!
//! # Example
//!
//! ```
//! use tinker_kernel::crafting_grid::{find_first_match, CraftingGrid, GridOffset, ShapedPattern};
//!
//! let grid = CraftingGrid::from_rows([
//!     [None, Some("plank"), None],
//!     [None, Some("plank"), None],
//!     [None, None, None],
//! ]);
//!
//! let stick = ShapedPattern::from_ids(&[&[Some("plank")], &[Some("plank")]]);
//! let recipes = [stick];
//!
//! let found = find_first_match(&grid, &recipes).expect("stick should match");
//! assert_eq!(found.index, 0);
//! assert_eq!(found.offset, GridOffset::new(0, 1));
//! ```

use std::mem;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tinker_common::{ItemId, Slot};

/// Grid side length.
pub const GRID_SIZE: usize = 3;

/// Number of cells in the grid.
pub const GRID_SLOTS: usize = GRID_SIZE * GRID_SIZE;

/// Top-left corner of a pattern's footprint inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridOffset {
    /// Row offset.
    pub row: usize,
    /// Column offset.
    pub col: usize,
}

impl GridOffset {
    /// Create an offset.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The 3x3 crafting grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CraftingGrid {
    /// Slots in row-major order.
    slots: [Slot; GRID_SLOTS],
}

impl CraftingGrid {
    /// Create an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from rows of item ids.
    #[must_use]
    pub fn from_rows(rows: [[Option<&str>; GRID_SIZE]; GRID_SIZE]) -> Self {
        let mut grid = Self::new();
        for (row, cells) in rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                grid.slots[row * GRID_SIZE + col] = cell.map(ItemId::from).into();
            }
        }
        grid
    }

    /// Row-major index of (row, col), or None if out of bounds.
    #[must_use]
    pub const fn index_of(row: usize, col: usize) -> Option<usize> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(row * GRID_SIZE + col)
        } else {
            None
        }
    }

    /// (row, col) of a row-major index, or None if out of bounds.
    #[must_use]
    pub const fn position_of(index: usize) -> Option<(usize, usize)> {
        if index < GRID_SLOTS {
            Some((index / GRID_SIZE, index % GRID_SIZE))
        } else {
            None
        }
    }

    /// Get the slot at a row-major index.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Get the item at (row, col), or None if empty or out of bounds.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&ItemId> {
        Self::index_of(row, col).and_then(|index| self.slots[index].item())
    }

    /// Replace the slot at `index`, returning the previous contents.
    /// Returns None if out of bounds.
    pub fn set(&mut self, index: usize, slot: Slot) -> Option<Slot> {
        let target = self.slots.get_mut(index)?;
        Some(mem::replace(target, slot))
    }

    /// Remove the item at `index`.
    pub fn take(&mut self, index: usize) -> Option<ItemId> {
        self.slots.get_mut(index)?.take()
    }

    /// Exchange two cells. Returns false if either index is out of bounds.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a < GRID_SLOTS && b < GRID_SLOTS {
            self.slots.swap(a, b);
            true
        } else {
            false
        }
    }

    /// Clear all slots.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
    }

    /// Check if the grid is completely empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Slot::is_empty)
    }

    /// Count non-empty slots.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// Get all slots as a slice.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Iterate over the items currently on the grid.
    pub fn items(&self) -> impl Iterator<Item = &ItemId> {
        self.slots.iter().filter_map(Slot::item)
    }
}

/// A recipe's required arrangement of ingredients.
///
/// Rows are stored as declared; `None` cells must be empty on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapedPattern {
    rows: Vec<Vec<Option<ItemId>>>,
}

impl ShapedPattern {
    /// Create a pattern from rows of optional item ids.
    #[must_use]
    pub fn new(rows: Vec<Vec<Option<ItemId>>>) -> Self {
        Self { rows }
    }

    /// Create a pattern from string ids.
    #[must_use]
    pub fn from_ids(rows: &[&[Option<&str>]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.map(ItemId::from)).collect())
                .collect(),
        )
    }

    /// Declared rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<ItemId>>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if rows have different lengths.
    #[must_use]
    pub fn is_ragged(&self) -> bool {
        self.rows.windows(2).any(|w| w[0].len() != w[1].len())
    }

    /// Check if the pattern fits inside the grid.
    #[must_use]
    pub fn fits_grid(&self) -> bool {
        (1..=GRID_SIZE).contains(&self.height()) && (1..=GRID_SIZE).contains(&self.width())
    }

    /// Iterate over every ingredient, flattening rows and skipping empty cells.
    pub fn ingredients(&self) -> impl Iterator<Item = &ItemId> {
        self.rows.iter().flatten().flatten()
    }

    /// Get the number of required items.
    #[must_use]
    pub fn ingredient_count(&self) -> usize {
        self.ingredients().count()
    }

    /// Check if the matcher will consider this pattern at all.
    ///
    /// Oversized patterns and patterns with no ingredients never match.
    #[must_use]
    pub fn is_craftable(&self) -> bool {
        self.fits_grid() && self.ingredient_count() > 0
    }

    /// Every offset at which the footprint lies inside the grid, row-major.
    #[must_use]
    pub fn offsets(&self) -> Vec<GridOffset> {
        if !self.fits_grid() {
            return Vec::new();
        }
        let max_row = GRID_SIZE - self.height();
        let max_col = GRID_SIZE - self.width();
        (0..=max_row)
            .flat_map(|row| (0..=max_col).map(move |col| GridOffset::new(row, col)))
            .collect()
    }

    /// Check the pattern against the grid at one offset.
    #[must_use]
    pub fn matches_at(&self, grid: &CraftingGrid, offset: GridOffset) -> bool {
        if offset.row + self.height() > GRID_SIZE || offset.col + self.width() > GRID_SIZE {
            return false;
        }
        self.rows.iter().enumerate().all(|(i, row)| {
            row.iter()
                .enumerate()
                .all(|(j, cell)| grid.cell(offset.row + i, offset.col + j) == cell.as_ref())
        })
    }

    /// First offset (row-major) at which the pattern matches.
    #[must_use]
    pub fn first_offset(&self, grid: &CraftingGrid) -> Option<GridOffset> {
        if !self.is_craftable() {
            return None;
        }
        self.offsets()
            .into_iter()
            .find(|&offset| self.matches_at(grid, offset))
    }

    /// All offsets at which the pattern matches.
    #[must_use]
    pub fn match_offsets(&self, grid: &CraftingGrid) -> Vec<GridOffset> {
        if !self.is_craftable() {
            return Vec::new();
        }
        self.offsets()
            .into_iter()
            .filter(|&offset| self.matches_at(grid, offset))
            .collect()
    }
}

/// Anything that carries a shaped pattern.
pub trait Shaped {
    /// The pattern to match.
    fn pattern(&self) -> &ShapedPattern;
}

impl Shaped for ShapedPattern {
    fn pattern(&self) -> &ShapedPattern {
        self
    }
}

/// A recipe found on the grid.
#[derive(Debug)]
pub struct PatternMatch<'a, R> {
    /// The matched recipe.
    pub recipe: &'a R,
    /// Position of the recipe in the list it was found in.
    pub index: usize,
    /// Where its footprint sits on the grid.
    pub offset: GridOffset,
}

/// Find the first recipe, in list order, whose pattern appears on the grid.
///
/// List order is priority order: when several recipes match, the earliest
/// one wins.
#[must_use]
pub fn find_first_match<'a, R: Shaped>(
    grid: &CraftingGrid,
    recipes: &'a [R],
) -> Option<PatternMatch<'a, R>> {
    let found = recipes.iter().enumerate().find_map(|(index, recipe)| {
        recipe
            .pattern()
            .first_offset(grid)
            .map(|offset| PatternMatch {
                recipe,
                index,
                offset,
            })
    });

    if let Some(m) = &found {
        debug!(
            "Recipe #{} matched at ({}, {})",
            m.index, m.offset.row, m.offset.col
        );
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn l_shape() -> ShapedPattern {
        ShapedPattern::from_ids(&[
            &[Some("a"), Some("a"), None],
            &[Some("a"), None, None],
            &[None, None, None],
        ])
    }

    #[test]
    fn test_crafting_grid_creation() {
        let grid = CraftingGrid::new();
        assert_eq!(grid.slots().len(), GRID_SLOTS);
        assert!(grid.is_empty());
        assert_eq!(grid.item_count(), 0);
    }

    #[test]
    fn test_crafting_grid_set_get() {
        let mut grid = CraftingGrid::new();

        assert_eq!(grid.set(4, Slot::occupied("gem")), Some(Slot::Empty));
        assert_eq!(grid.cell(1, 1), Some(&ItemId::new("gem")));
        assert!(!grid.is_empty());

        assert_eq!(grid.take(4), Some(ItemId::new("gem")));
        assert!(grid.is_empty());

        assert_eq!(grid.set(9, Slot::occupied("gem")), None);
        assert_eq!(grid.cell(3, 0), None);
    }

    #[test]
    fn test_index_position_conversion() {
        assert_eq!(CraftingGrid::index_of(2, 1), Some(7));
        assert_eq!(CraftingGrid::position_of(7), Some((2, 1)));
        assert_eq!(CraftingGrid::index_of(0, 3), None);
        assert_eq!(CraftingGrid::position_of(9), None);
    }

    #[test]
    fn test_swap_out_of_bounds() {
        let mut grid = CraftingGrid::from_rows([[Some("a"), None, None]; 3]);
        assert!(grid.swap(0, 8));
        assert_eq!(grid.cell(2, 2), Some(&ItemId::new("a")));
        assert!(!grid.swap(0, 9));
    }

    #[test]
    fn test_l_shape_at_origin() {
        let grid = CraftingGrid::from_rows([
            [Some("a"), Some("a"), None],
            [Some("a"), None, None],
            [None, None, None],
        ]);
        assert_eq!(l_shape().first_offset(&grid), Some(GridOffset::new(0, 0)));
    }

    #[test]
    fn test_two_of_three_does_not_match() {
        let grid = CraftingGrid::from_rows([
            [Some("a"), Some("a"), None],
            [None, None, None],
            [None, None, None],
        ]);
        assert_eq!(l_shape().first_offset(&grid), None);
    }

    #[test]
    fn test_shifted_footprint_matches() {
        let pattern = ShapedPattern::from_ids(&[&[Some("a"), Some("a")], &[Some("a"), None]]);
        let grid = CraftingGrid::from_rows([
            [None, Some("a"), Some("a")],
            [None, Some("a"), None],
            [None, None, None],
        ]);
        assert_eq!(pattern.first_offset(&grid), Some(GridOffset::new(0, 1)));
        assert_eq!(pattern.match_offsets(&grid), vec![GridOffset::new(0, 1)]);
    }

    #[test]
    fn test_declared_empty_cells_must_be_empty() {
        let pattern = ShapedPattern::from_ids(&[&[Some("a"), None]]);
        let blocked = CraftingGrid::from_rows([
            [Some("a"), Some("b"), None],
            [None, None, None],
            [None, None, None],
        ]);
        // (0,0) is blocked by "b"; (0,1) would need "a" under the first cell.
        assert_eq!(pattern.first_offset(&blocked), None);

        let open = CraftingGrid::from_rows([
            [Some("a"), None, Some("b")],
            [None, None, None],
            [None, None, None],
        ]);
        assert_eq!(pattern.first_offset(&open), Some(GridOffset::new(0, 0)));
    }

    #[test]
    fn test_cells_outside_footprint_unconstrained() {
        let pattern = ShapedPattern::from_ids(&[&[Some("a")]]);
        let grid = CraftingGrid::from_rows([
            [Some("x"), Some("y"), Some("z")],
            [Some("x"), Some("a"), Some("z")],
            [Some("x"), Some("y"), Some("z")],
        ]);
        assert_eq!(pattern.first_offset(&grid), Some(GridOffset::new(1, 1)));
    }

    #[test]
    fn test_oversized_pattern_skipped() {
        let tall = ShapedPattern::from_ids(&[
            &[Some("a")],
            &[Some("a")],
            &[Some("a")],
            &[Some("a")],
        ]);
        let grid = CraftingGrid::from_rows([[Some("a"), None, None]; 3]);
        assert!(!tall.fits_grid());
        assert!(tall.offsets().is_empty());
        assert_eq!(find_first_match(&grid, &[tall]).map(|m| m.index), None);
    }

    #[test]
    fn test_pattern_without_ingredients_never_matches() {
        let blank = ShapedPattern::from_ids(&[&[None, None]]);
        assert!(!blank.is_craftable());
        assert_eq!(blank.first_offset(&CraftingGrid::new()), None);
    }

    #[test]
    fn test_ragged_pattern_constrains_declared_cells_only() {
        let ragged = ShapedPattern::from_ids(&[&[Some("a"), Some("a")], &[Some("a")]]);
        assert!(ragged.is_ragged());
        assert_eq!(ragged.width(), 2);

        let grid = CraftingGrid::from_rows([
            [Some("a"), Some("a"), None],
            [Some("a"), Some("b"), None],
            [None, None, None],
        ]);
        assert_eq!(ragged.first_offset(&grid), Some(GridOffset::new(0, 0)));
    }

    #[test]
    fn test_catalog_order_is_priority() {
        let single = ShapedPattern::from_ids(&[&[Some("a")]]);
        let pair = ShapedPattern::from_ids(&[&[Some("a"), Some("a")]]);
        let grid = CraftingGrid::from_rows([
            [Some("a"), Some("a"), None],
            [None, None, None],
            [None, None, None],
        ]);

        let recipes = [pair.clone(), single.clone()];
        let found = find_first_match(&grid, &recipes).expect("pair should match");
        assert_eq!(found.index, 0);

        let recipes = [single, pair];
        let found = find_first_match(&grid, &recipes).expect("single should match");
        assert_eq!(found.index, 0);
        assert_eq!(found.offset, GridOffset::new(0, 0));
    }

    #[test]
    fn test_pattern_json_is_nested_arrays() {
        let json = r#"[["a", null], [null, "b"]]"#;
        let pattern: ShapedPattern = serde_json::from_str(json).expect("deserialize");
        assert_eq!(pattern.height(), 2);
        assert_eq!(pattern.width(), 2);
        assert_eq!(pattern.ingredient_count(), 2);
    }

    fn cell() -> impl Strategy<Value = Option<&'static str>> {
        prop_oneof![Just(None), Just(Some("a")), Just(Some("b"))]
    }

    fn grid_strategy() -> impl Strategy<Value = CraftingGrid> {
        prop::collection::vec(cell(), GRID_SLOTS).prop_map(|cells| {
            let mut grid = CraftingGrid::new();
            for (index, cell) in cells.into_iter().enumerate() {
                grid.set(index, cell.map(ItemId::from).into());
            }
            grid
        })
    }

    fn pattern_strategy() -> impl Strategy<Value = ShapedPattern> {
        (1usize..=3, 1usize..=3)
            .prop_flat_map(|(h, w)| prop::collection::vec(prop::collection::vec(cell(), w), h))
            .prop_map(|rows| {
                ShapedPattern::new(
                    rows.into_iter()
                        .map(|row| row.into_iter().map(|c| c.map(ItemId::from)).collect())
                        .collect(),
                )
            })
    }

    proptest! {
        #[test]
        fn prop_match_is_deterministic(
            grid in grid_strategy(),
            recipes in prop::collection::vec(pattern_strategy(), 1..6),
        ) {
            let first = find_first_match(&grid, &recipes).map(|m| (m.index, m.offset));
            let second = find_first_match(&grid, &recipes).map(|m| (m.index, m.offset));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_reordering_keeps_match_existence(
            grid in grid_strategy(),
            recipes in prop::collection::vec(pattern_strategy(), 1..6),
        ) {
            let mut reversed = recipes.clone();
            reversed.reverse();
            prop_assert_eq!(
                find_first_match(&grid, &recipes).is_some(),
                find_first_match(&grid, &reversed).is_some()
            );
        }

        #[test]
        fn prop_winner_is_earliest_matching(
            grid in grid_strategy(),
            recipes in prop::collection::vec(pattern_strategy(), 1..6),
        ) {
            if let Some(found) = find_first_match(&grid, &recipes) {
                prop_assert!(found.recipe.matches_at(&grid, found.offset));
                for earlier in &recipes[..found.index] {
                    prop_assert!(earlier.first_offset(&grid).is_none());
                }
            } else {
                for recipe in &recipes {
                    prop_assert!(recipe.match_offsets(&grid).is_empty());
                }
            }
        }

        #[test]
        fn prop_pattern_stamped_on_empty_grid_matches(pattern in pattern_strategy()) {
            prop_assume!(pattern.is_craftable());
            for offset in pattern.offsets() {
                let mut grid = CraftingGrid::new();
                for (i, row) in pattern.rows().iter().enumerate() {
                    for (j, cell) in row.iter().enumerate() {
                        let index = CraftingGrid::index_of(offset.row + i, offset.col + j)
                            .expect("footprint inside grid");
                        grid.set(index, cell.clone().into());
                    }
                }
                prop_assert!(pattern.match_offsets(&grid).contains(&offset));
            }
        }
    }
}
